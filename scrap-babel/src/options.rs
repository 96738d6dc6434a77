//! Knobs for conversion, publishing and extraction.
//!
//! The defaults here match `scrap-config`'s embedded defaults, so the library
//! behaves the same with or without the config crate.

/// Options for HTML → block conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Nesting levels a block may keep inline before its children are
    /// detached and deferred to separate append calls.
    pub max_inline_depth: usize,
    /// Maximum characters per rich-text run.
    pub text_limit: usize,
    /// Appended to truncated runs; counted within `text_limit`.
    pub truncation_marker: String,
    /// Pad short table rows with empty cells up to the widest row.
    pub pad_ragged_tables: bool,
    /// Text of the quote block linking back to the source page.
    pub reference_label: String,
    /// First line of the synthetic footnote callout.
    pub footnote_label: String,
    /// Notice for embeds of an unknown type; `{name}` is replaced by the type.
    pub unknown_embed_text: String,
    /// Notice for embeds whose target could not be read.
    pub failed_embed_text: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_inline_depth: 2,
            text_limit: 2000,
            truncation_marker: "... (too long)".to_string(),
            pad_ragged_tables: true,
            reference_label: "オリジナルの web ページ".to_string(),
            footnote_label: "注釈".to_string(),
            unknown_embed_text: "埋め込み要素 {name} (取得不可能)".to_string(),
            failed_embed_text: "埋め込み要素(取得失敗)".to_string(),
        }
    }
}

/// Options for the publish bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Pages whose measured nesting reaches this depth skip the deferred
    /// append phase entirely.
    pub max_deferred_depth: usize,
    /// Page size used when listing the children of the created page.
    pub page_size: usize,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            max_deferred_depth: 4,
            page_size: 100,
        }
    }
}

/// Options for blocks → markdown extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Rendering of a paragraph without text.
    pub blank_paragraph: String,
    /// Wrap callouts in a `:::message` fence.
    pub callout_as_message: bool,
    /// Prefix for links that point at other pages.
    pub page_link_emoji: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            blank_paragraph: "\n<br>\n".to_string(),
            callout_as_message: true,
            page_link_emoji: "\u{1F4C4}".to_string(),
        }
    }
}
