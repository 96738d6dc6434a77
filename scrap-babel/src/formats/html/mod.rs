//! HTML parsing and DOM queries
//!
//! # Library Choice
//!
//! Pages are parsed with `html5ever` into a `markup5ever_rcdom` tree, the same
//! browser-grade parser used for serialization of diagnostics fragments.
//! Tag and attribute names come out lower-cased (`dateTime` → `datetime`),
//! and tables always gain an implicit `tbody`.
//!
//! Site pages are styled with CSS modules, so class names carry a hashed
//! suffix (`View_title__ASFih`). Lookups therefore match on class prefixes
//! rather than full names.

pub mod cursor;
pub mod tokenizer;

use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, serialize};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::rc::Rc;

const FRAGMENT_LIMIT: usize = 300;

/// Parse a full HTML document.
pub fn parse_html(source: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(source)
}

/// Lower-case tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

pub fn is_tag(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| (*a.value).to_string()),
        _ => None,
    }
}

pub fn has_attr(node: &Handle, name: &str) -> bool {
    attr(node, name).is_some()
}

pub fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

/// Whether any class starts with `prefix` (hashed CSS-module names).
pub fn has_class_prefix(node: &Handle, prefix: &str) -> bool {
    classes(node).iter().any(|c| c.starts_with(prefix))
}

pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

/// All descendant nodes in document order, excluding `node` itself.
pub fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    collect_descendants(node, &mut out);
    out
}

fn collect_descendants(node: &Handle, out: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        out.push(child.clone());
        collect_descendants(child, out);
    }
}

/// First descendant element matching `predicate`.
pub fn find_first(node: &Handle, predicate: impl Fn(&Handle) -> bool) -> Option<Handle> {
    find_first_dyn(node, &predicate)
}

fn find_first_dyn(node: &Handle, predicate: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if is_element(child) && predicate(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_first_dyn(child, predicate) {
            return Some(found);
        }
    }
    None
}

/// Every descendant element matching `predicate`, in document order.
pub fn find_all(node: &Handle, predicate: impl Fn(&Handle) -> bool) -> Vec<Handle> {
    descendants(node)
        .into_iter()
        .filter(|n| is_element(n) && predicate(n))
        .collect()
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// Non-empty, trimmed text of each descendant text node.
///
/// Stands in for a rendered `innerText.split("\n")` where every label sits
/// in its own element.
pub fn text_lines(node: &Handle) -> Vec<String> {
    descendants(node)
        .iter()
        .filter_map(|n| match &n.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().trim().to_string();
                (!text.is_empty()).then_some(text)
            }
            _ => None,
        })
        .collect()
}

/// Text made only of line breaks, spaces and ideographic spaces.
pub fn is_blank_text(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    node.parent.set(weak.clone());
    weak.and_then(|w| w.upgrade())
}

/// Parent when it is an element (not the document root).
pub fn parent_element(node: &Handle) -> Option<Handle> {
    parent(node).filter(is_element)
}

fn sibling_elements(node: &Handle) -> Option<(Vec<Handle>, usize)> {
    let parent = parent(node)?;
    let siblings = element_children(&parent);
    let position = siblings.iter().position(|s| Rc::ptr_eq(s, node))?;
    Some((siblings, position))
}

pub fn next_element_sibling(node: &Handle) -> Option<Handle> {
    let (siblings, position) = sibling_elements(node)?;
    siblings.get(position + 1).cloned()
}

pub fn previous_element_sibling(node: &Handle) -> Option<Handle> {
    let (siblings, position) = sibling_elements(node)?;
    position.checked_sub(1).and_then(|p| siblings.get(p).cloned())
}

/// Markup of `node` including the node itself.
pub fn outer_html(node: &Handle) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(node.clone());
    match serialize(&mut output, &serializable, opts) {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(_) => format!("<{}>", tag_name(node).unwrap_or("#node")),
    }
}

/// Shortened markup for error and warning messages.
pub fn fragment(node: &Handle) -> String {
    if let NodeData::Text { contents } = &node.data {
        return format!("#text {:?}", contents.borrow().chars().take(40).collect::<String>());
    }
    let html = outer_html(node);
    if html.chars().count() <= FRAGMENT_LIMIT {
        html
    } else {
        let mut short: String = html.chars().take(FRAGMENT_LIMIT).collect();
        short.push('…');
        short
    }
}
