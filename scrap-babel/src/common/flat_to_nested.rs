//! Rebuilds the nested block tree from flat records.
//!
//! # The High-Level Concept
//!
//! This is the reverse of `nested_to_flat`. Detached children live in their
//! own records and only point back at their parent, so the tree is recovered
//! by grouping the deferred ids under their parents and re-attaching each
//! group to the parent's payload.
//!
//! # The Algorithm
//!
//! 1. **Group:** walk the deferred ids in order and bucket them by
//!    `parent_id`. The deferred list is in pre-order, so each bucket keeps the
//!    original sibling order.
//!
//! 2. **Rebuild:** for every top-level id, clone its payload and, if it has a
//!    bucket, rebuild the bucket's blocks recursively and set them as the
//!    payload's children.
//!
//! Used to render a converted page offline (e.g. to markdown) exactly as the
//! API would show it after all append calls went through.

use crate::blocks::Block;
use crate::common::nested_to_flat::FlatRecord;
use crate::error::ConvertError;
use std::collections::{BTreeMap, HashMap};

/// Rebuild the page content in top-level order.
pub fn reassemble<T>(
    topblock_ids: &[String],
    children_ids: &[String],
    records: &BTreeMap<String, FlatRecord<T>>,
) -> Result<Vec<Block>, ConvertError> {
    let mut buckets: HashMap<&str, Vec<&str>> = HashMap::new();
    for id in children_ids {
        let record = lookup(records, id)?;
        if let Some(parent) = record.parent_id.as_deref() {
            buckets.entry(parent).or_default().push(id);
        }
    }
    topblock_ids
        .iter()
        .map(|id| rebuild(id, records, &buckets))
        .collect()
}

fn rebuild<T>(
    id: &str,
    records: &BTreeMap<String, FlatRecord<T>>,
    buckets: &HashMap<&str, Vec<&str>>,
) -> Result<Block, ConvertError> {
    let mut block = lookup(records, id)?.block.clone();
    if let Some(child_ids) = buckets.get(id) {
        let children = child_ids
            .iter()
            .map(|child| rebuild(child, records, buckets))
            .collect::<Result<Vec<_>, _>>()?;
        block.set_children(children).map_err(|_| {
            ConvertError::InvalidInput(format!(
                "record '{id}' of type {} cannot hold children",
                block.kind_name()
            ))
        })?;
    }
    Ok(block)
}

fn lookup<'r, T>(
    records: &'r BTreeMap<String, FlatRecord<T>>,
    id: &str,
) -> Result<&'r FlatRecord<T>, ConvertError> {
    records
        .get(id)
        .ok_or_else(|| ConvertError::InvalidInput(format!("no record for block id '{id}'")))
}
