//! Converts a nested block tree into flat, id-addressed records.
//!
//! # The High-Level Concept
//!
//! The page API only accepts a shallow tree when a page is created. Anything
//! nested deeper has to be attached afterwards, one "append children" call per
//! parent, once that parent has a remote id. Flattening records every block
//! under a local id with a back-reference to its parent, and cuts the tree
//! exactly where the inline limit is reached so the deeper levels can be sent
//! separately.
//!
//! # The Algorithm
//!
//! 1. **Measure:** [`nest_depth`] is the longest chain of nestable blocks
//!    carrying children below the current block (zero for a leaf).
//!
//! 2. **Record:** a fresh id is drawn from the injected [`IdSource`] and the
//!    block is stored with its parent id, whatever its depth.
//!
//! 3. **Stop or detach:**
//!    - If the remaining depth fits the inline limit, or the block is not a
//!      nestable kind, its children stay embedded in the payload
//!    - Otherwise the children are detached (the stored payload becomes
//!      childless) and each child is flattened with one level less
//!
//! 4. **Report:** every id produced below a detached block is returned in
//!    pre-order, so a parent always precedes its descendants in the deferred
//!    list.

use crate::blocks::Block;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Source of unique local block ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable ids (`block-1`, `block-2`, ...) for tests and reproducible output.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    issued: usize,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("block-{}", self.issued)
    }
}

/// One block of a flattened page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord<T> {
    pub self_id: String,
    /// Remote id, empty until the block has been created remotely
    pub notion_id: String,
    pub block: Block,
    pub parent_id: Option<String>,
    pub options: T,
}

impl<T> FlatRecord<T> {
    pub fn new(self_id: impl Into<String>, block: Block, parent_id: Option<String>, options: T) -> Self {
        Self {
            self_id: self_id.into(),
            notion_id: String::new(),
            block,
            parent_id,
            options,
        }
    }
}

/// Result of flattening one top-level block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub id: String,
    /// Ids whose payloads must be appended after creation, parents first
    pub deferred: Vec<String>,
}

/// Longest chain of nestable blocks with children below `block`.
pub fn nest_depth(block: &Block) -> usize {
    if !block.is_nestable() {
        return 0;
    }
    match block.children() {
        Some(children) if !children.is_empty() => {
            1 + children.iter().map(nest_depth).max().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Shared state of one flattening pass.
pub struct Flattener<'a, T> {
    ids: &'a mut dyn IdSource,
    records: &'a mut BTreeMap<String, FlatRecord<T>>,
    max_inline_depth: usize,
}

impl<'a, T: Clone> Flattener<'a, T> {
    pub fn new(
        ids: &'a mut dyn IdSource,
        records: &'a mut BTreeMap<String, FlatRecord<T>>,
        max_inline_depth: usize,
    ) -> Self {
        Self {
            ids,
            records,
            max_inline_depth,
        }
    }

    /// Flatten a top-level block, measuring its depth first.
    pub fn flatten_top(&mut self, block: Block, options: &T) -> Flattened {
        let depth = nest_depth(&block);
        self.flatten(block, depth, None, options)
    }

    /// Record `block` and, when it is too deep, its detached descendants.
    pub fn flatten(
        &mut self,
        mut block: Block,
        remaining_depth: usize,
        parent_id: Option<String>,
        options: &T,
    ) -> Flattened {
        let id = self.ids.next_id();
        let mut deferred = Vec::new();

        if remaining_depth > self.max_inline_depth && block.is_nestable() {
            if let Some(children) = block.take_children() {
                for child in children {
                    let child = self.flatten(
                        child,
                        remaining_depth - 1,
                        Some(id.clone()),
                        options,
                    );
                    deferred.push(child.id);
                    deferred.extend(child.deferred);
                }
            }
        }

        self.records.insert(
            id.clone(),
            FlatRecord::new(id.clone(), block, parent_id, options.clone()),
        );
        Flattened { id, deferred }
    }
}
