//! Site adapter tests
//!
//! Saved pages in ./fixtures converted end to end, with deterministic ids.

mod note;
mod zenn;

use scrap_babel::transforms::convert_html;
use scrap_babel::{Conversion, ConvertOptions, SequentialIds, SitePage};

pub fn convert(fixture: &str, url: &str) -> Conversion {
    let html = crate::common::fixture("sites", fixture);
    let mut ids = SequentialIds::new();
    convert_html(&html, url, None, &ConvertOptions::default(), &mut ids)
        .unwrap_or_else(|e| panic!("{fixture} failed to convert: {e}"))
}

/// Type names of the page's top-level blocks, reserved records included.
pub fn top_kinds(page: &SitePage) -> Vec<&'static str> {
    page.top_blocks()
        .map(|block| block.map(|b| b.kind_name()).unwrap_or("<missing>"))
        .collect()
}
