//! Common utilities for site adapters
//!
//! Page chrome (titles, author boxes, topic lists) is located by class prefix.
//! Parts without which no page can be built are required; decorative metadata
//! degrades to a warning when the site layout changes.

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::ConvertError;
use crate::formats::html::{find_first, fragment, has_class_prefix};
use markup5ever_rcdom::{Handle, RcDom};

/// First element carrying a class that starts with `prefix`.
pub fn by_class_prefix(root: &Handle, prefix: &str) -> Option<Handle> {
    find_first(root, |n| has_class_prefix(n, prefix))
}

/// Locate a part the page cannot be built without.
pub fn require(
    document: &RcDom,
    found: Option<Handle>,
    what: &str,
) -> Result<Handle, ConvertError> {
    found.ok_or_else(|| missing(document, what))
}

/// Error for a required part that is absent from the page.
pub fn missing(document: &RcDom, what: &str) -> ConvertError {
    ConvertError::UnexpectedTree {
        message: format!("{what} not found"),
        fragment: document_fragment(document),
    }
}

/// Locate decorative metadata, warning when it is missing.
pub fn optional(found: Option<Handle>, what: &str, diagnostics: &mut Diagnostics) -> Option<Handle> {
    if found.is_none() {
        diagnostics.warn(WarningKind::MissingMetadata, format!("{what} not found"));
    }
    found
}

fn document_fragment(document: &RcDom) -> String {
    match find_first(&document.document, |n| crate::formats::html::is_tag(n, "body")) {
        Some(body) => fragment(&body),
        None => "#document".to_string(),
    }
}
