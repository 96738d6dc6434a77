//! Lock-step walk over one element's children.
//!
//! The tokenizer iterates every child node (text interleaves with elements)
//! while a second cursor runs over the child elements alone. Each element
//! step pops exactly one entry off the element cursor and checks that both
//! cursors point at the same node, so a desync surfaces as an error instead
//! of silently skipping or double-counting an element.

use super::{fragment, is_blank_text, is_element};
use crate::error::ConvertError;
use markup5ever_rcdom::{Handle, NodeData};
use std::collections::VecDeque;
use std::rc::Rc;

/// One significant child of the walked element.
#[derive(Clone)]
pub enum Step {
    Text(String),
    Element(Handle),
}

pub struct ChildCursor {
    nodes: VecDeque<Handle>,
    elements: VecDeque<Handle>,
}

impl ChildCursor {
    pub fn new(parent: &Handle) -> Self {
        let nodes: VecDeque<Handle> = parent.children.borrow().iter().cloned().collect();
        let elements = nodes.iter().filter(|n| is_element(n)).cloned().collect();
        Self { nodes, elements }
    }

    /// Build a cursor from explicit node and element sequences.
    #[cfg(test)]
    pub(crate) fn from_parts(nodes: Vec<Handle>, elements: Vec<Handle>) -> Self {
        Self {
            nodes: nodes.into(),
            elements: elements.into(),
        }
    }

    /// Advance to the next text or element child.
    ///
    /// Comments, doctypes and processing instructions are skipped without
    /// touching the element cursor.
    pub fn next_step(&mut self) -> Result<Option<Step>, ConvertError> {
        while let Some(node) = self.nodes.pop_front() {
            match &node.data {
                NodeData::Text { contents } => {
                    return Ok(Some(Step::Text(contents.borrow().to_string())));
                }
                NodeData::Element { .. } => {
                    self.pop_element(&node)?;
                    return Ok(Some(Step::Element(node)));
                }
                _ => continue,
            }
        }
        Ok(None)
    }

    fn pop_element(&mut self, node: &Handle) -> Result<(), ConvertError> {
        match self.elements.pop_front() {
            None => Err(ConvertError::CursorUnderflow {
                fragment: fragment(node),
            }),
            Some(element) if !Rc::ptr_eq(&element, node) => Err(ConvertError::CursorDesync {
                expected: fragment(node),
                found: fragment(&element),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Next element on the element cursor, without consuming anything.
    ///
    /// After an element step this is that element's next element sibling.
    pub fn peek_element(&self) -> Option<&Handle> {
        self.elements.front()
    }

    /// Next child that is neither blank text nor a comment.
    pub fn peek_significant(&self) -> Option<&Handle> {
        self.nodes.iter().find(|node| match &node.data {
            NodeData::Text { contents } => !is_blank_text(&contents.borrow()),
            NodeData::Element { .. } => true,
            _ => false,
        })
    }

    /// Skip blank text up to and including the next element.
    ///
    /// Used after a look-ahead decided the sibling belongs to the current
    /// element. Returns `None` when non-blank text comes first.
    pub fn consume_element(&mut self) -> Result<Option<Handle>, ConvertError> {
        loop {
            let Some(node) = self.nodes.front() else {
                return Ok(None);
            };
            match &node.data {
                NodeData::Text { contents } if is_blank_text(&contents.borrow()) => {}
                NodeData::Text { .. } => return Ok(None),
                NodeData::Element { .. } => {
                    let node = node.clone();
                    self.nodes.pop_front();
                    self.pop_element(&node)?;
                    return Ok(Some(node));
                }
                _ => {}
            }
            self.nodes.pop_front();
        }
    }
}
