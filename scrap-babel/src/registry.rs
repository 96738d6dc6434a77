//! Site registry for adapter discovery and selection
//!
//! Adapters are registered by name and can be looked up either by that name or
//! by the URL of the page being converted.

use crate::error::ConvertError;
use crate::format::SiteFormat;
use crate::formats::{NoteArticle, ZennArticle, ZennScrap};
use std::collections::HashMap;
use url::Url;

/// Registry of site adapters
///
/// # Examples
///
/// ```ignore
/// let registry = SiteRegistry::default();
/// let url = Url::parse("https://zenn.dev/alice/articles/intro")?;
/// let site = registry.detect(&url)?;
/// assert_eq!(site.name(), "zenn-article");
/// ```
pub struct SiteRegistry {
    sites: HashMap<String, Box<dyn SiteFormat>>,
}

impl SiteRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        SiteRegistry {
            sites: HashMap::new(),
        }
    }

    /// Register an adapter
    ///
    /// If an adapter with the same name already exists, it will be replaced.
    pub fn register<S: SiteFormat + 'static>(&mut self, site: S) {
        self.sites.insert(site.name().to_string(), Box::new(site));
    }

    /// Get an adapter by name
    pub fn get(&self, name: &str) -> Result<&dyn SiteFormat, ConvertError> {
        self.sites
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| ConvertError::SiteNotFound(name.to_string()))
    }

    /// Check if an adapter exists
    pub fn has(&self, name: &str) -> bool {
        self.sites.contains_key(name)
    }

    /// List all adapter names (sorted)
    pub fn list_sites(&self) -> Vec<String> {
        let mut names: Vec<_> = self.sites.keys().cloned().collect();
        names.sort();
        names
    }

    /// Pick the adapter that handles `url`
    ///
    /// Adapters are tried in name order so detection is deterministic.
    pub fn detect(&self, url: &Url) -> Result<&dyn SiteFormat, ConvertError> {
        self.list_sites()
            .iter()
            .filter_map(|name| self.sites.get(name))
            .find(|site| site.matches(url))
            .map(|site| site.as_ref())
            .ok_or_else(|| ConvertError::UnsupportedUrl(url.to_string()))
    }

    /// Create a registry with the built-in adapters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ZennArticle);
        registry.register(ZennScrap);
        registry.register(NoteArticle);
        registry
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
