//! Site adapter trait definition
//!
//! This module defines the `SiteFormat` trait every site adapter implements.
//! An adapter knows which URLs it handles, where the title, metadata and body
//! live in the site's markup, and how the converted content is laid out on the
//! resulting page.

use crate::common::nested_to_flat::IdSource;
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::formats::html::parse_html;
use crate::options::ConvertOptions;
use crate::page::SitePage;
use markup5ever_rcdom::RcDom;
use url::Url;

/// A converted page together with the warnings raised while converting it.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub page: SitePage,
    pub diagnostics: Diagnostics,
}

/// Trait for site adapters
///
/// # Examples
///
/// ```ignore
/// struct MySite;
///
/// impl SiteFormat for MySite {
///     fn name(&self) -> &str {
///         "my-site"
///     }
///
///     fn matches(&self, url: &Url) -> bool {
///         url.host_str() == Some("my.site")
///     }
///
///     fn convert(
///         &self,
///         document: &RcDom,
///         url: &Url,
///         options: &ConvertOptions,
///         ids: &mut dyn IdSource,
///     ) -> Result<Conversion, ConvertError> {
///         // Locate the body, tokenize it and assemble the page
///         todo!()
///     }
/// }
/// ```
pub trait SiteFormat: Send + Sync {
    /// The name of this adapter (e.g., "zenn-article")
    fn name(&self) -> &str;

    /// Optional description of this adapter
    fn description(&self) -> &str {
        ""
    }

    /// Whether this adapter handles pages at `url`
    fn matches(&self, url: &Url) -> bool;

    /// Convert a parsed document into a page descriptor
    fn convert(
        &self,
        document: &RcDom,
        url: &Url,
        options: &ConvertOptions,
        ids: &mut dyn IdSource,
    ) -> Result<Conversion, ConvertError>;

    /// Parse `html` and convert it
    fn convert_html(
        &self,
        html: &str,
        url: &Url,
        options: &ConvertOptions,
        ids: &mut dyn IdSource,
    ) -> Result<Conversion, ConvertError> {
        let document = parse_html(html);
        self.convert(&document, url, options, ids)
    }
}
