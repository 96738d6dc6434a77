//! Shared configuration loader for the scrap toolchain.
//!
//! `defaults/scrap.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ScrapConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use scrap_babel::options::{ConvertOptions, ExtractOptions, PublishOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/scrap.default.toml");

/// Top-level configuration consumed by scrap applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapConfig {
    pub convert: ConvertConfig,
    pub publish: PublishConfig,
    pub extract: ExtractConfig,
}

/// Mirrors the knobs of HTML → block conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub max_inline_depth: usize,
    pub text_limit: usize,
    pub truncation_marker: String,
    pub pad_ragged_tables: bool,
    pub reference_label: String,
    pub footnote_label: String,
    pub unknown_embed_text: String,
    pub failed_embed_text: String,
}

impl From<ConvertConfig> for ConvertOptions {
    fn from(config: ConvertConfig) -> Self {
        ConvertOptions {
            max_inline_depth: config.max_inline_depth,
            text_limit: config.text_limit,
            truncation_marker: config.truncation_marker,
            pad_ragged_tables: config.pad_ragged_tables,
            reference_label: config.reference_label,
            footnote_label: config.footnote_label,
            unknown_embed_text: config.unknown_embed_text,
            failed_embed_text: config.failed_embed_text,
        }
    }
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        config.clone().into()
    }
}

/// Settings for the `scrap_babel::publish` bridge.
///
/// The CLI has no page API client, so it never reads this section; library
/// callers that implement `PageApi` convert it with `PublishOptions::from`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    pub max_deferred_depth: usize,
    pub page_size: usize,
}

impl From<&PublishConfig> for PublishOptions {
    fn from(config: &PublishConfig) -> Self {
        PublishOptions {
            max_deferred_depth: config.max_deferred_depth,
            page_size: config.page_size,
        }
    }
}

/// Blocks → Markdown rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    pub blank_paragraph: String,
    pub callout_as_message: bool,
    pub page_link_emoji: String,
}

impl From<&ExtractConfig> for ExtractOptions {
    fn from(config: &ExtractConfig) -> Self {
        ExtractOptions {
            blank_paragraph: config.blank_paragraph.clone(),
            callout_as_message: config.callout_as_message,
            page_link_emoji: config.page_link_emoji.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ScrapConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ScrapConfig, ConfigError> {
    Loader::new().build()
}
