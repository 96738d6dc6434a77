//! Side-channel for non-fatal conversion problems.
//!
//! Every recorded warning is also emitted through `tracing` so that callers
//! who only install a subscriber still see them.

use serde::Serialize;
use std::fmt;

/// Category of a non-fatal degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Element type the tokenizer does not handle; it was skipped
    NotImplemented,
    /// Text longer than the run limit was cut
    TextTruncated,
    /// Code language outside the allow-list, replaced by "plain text"
    UnknownLanguage,
    /// Image URL without an image extension, emitted as an embed
    NonImageUrl,
    /// Embedded widget of an unknown type, emitted as a notice
    UnknownEmbed,
    /// Table rows of different widths
    RaggedTable,
    /// Table without a single row, skipped
    EmptyTable,
    /// Page metadata (author, topics, icon) could not be found
    MissingMetadata,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::NotImplemented => "not implemented",
            WarningKind::TextTruncated => "text truncated",
            WarningKind::UnknownLanguage => "unknown language",
            WarningKind::NonImageUrl => "non-image url",
            WarningKind::UnknownEmbed => "unknown embed",
            WarningKind::RaggedTable => "ragged table",
            WarningKind::EmptyTable => "empty table",
            WarningKind::MissingMetadata => "missing metadata",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    /// Offending markup, when the warning concerns a specific element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Warnings collected during one conversion call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, "{message}");
        self.warnings.push(Warning {
            kind,
            message,
            fragment: None,
        });
    }

    /// Record a warning tied to a piece of markup.
    pub fn warn_at(&mut self, kind: WarningKind, message: impl Into<String>, fragment: String) {
        let message = message.into();
        tracing::warn!(kind = %kind, fragment = %fragment, "{message}");
        self.warnings.push(Warning {
            kind,
            message,
            fragment: Some(fragment),
        });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Number of warnings of the given kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
