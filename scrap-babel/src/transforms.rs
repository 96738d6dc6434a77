//! One-call entry points for the conversion pipeline
//!
//! These wrap registry lookup, parsing, conversion and serialization into
//! single functions for callers that do not need to drive the stages
//! themselves, such as the cli.

use crate::common::nested_to_flat::IdSource;
use crate::error::ConvertError;
use crate::format::Conversion;
use crate::formats::markdown::{blocks_to_markdown, load_blocks};
use crate::options::{ConvertOptions, ExtractOptions};
use crate::page::SitePage;
use crate::registry::SiteRegistry;
use url::Url;

/// Convert the HTML of the page at `url`.
///
/// The adapter is picked by `site` when given, otherwise detected from the URL.
///
/// # Example
///
/// ```ignore
/// let mut ids = SequentialIds::new();
/// let conversion = convert_html(&html, "https://zenn.dev/a/articles/b", None,
///     &ConvertOptions::default(), &mut ids)?;
/// println!("{}", page_to_json(&conversion.page)?);
/// ```
pub fn convert_html(
    html: &str,
    url: &str,
    site: Option<&str>,
    options: &ConvertOptions,
    ids: &mut dyn IdSource,
) -> Result<Conversion, ConvertError> {
    let url = Url::parse(url).map_err(|e| ConvertError::UnsupportedUrl(format!("{url} ({e})")))?;
    let registry = SiteRegistry::default();
    let adapter = match site {
        Some(name) => registry.get(name)?,
        None => registry.detect(&url)?,
    };
    tracing::debug!(site = adapter.name(), %url, "converting page");
    adapter.convert_html(html, &url, options, ids)
}

/// Pretty JSON of a converted page.
pub fn page_to_json(page: &SitePage) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(page)?)
}

/// Render block JSON (see [`load_blocks`]) as Markdown.
pub fn extract_markdown(json: &str, options: &ExtractOptions) -> Result<String, ConvertError> {
    let blocks = load_blocks(json)?;
    Ok(blocks_to_markdown(&blocks, options))
}
