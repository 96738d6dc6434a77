//! Error types for conversion and publishing

use std::fmt;

/// Fatal errors raised while turning a page into blocks.
///
/// Non-fatal degradations never show up here; they are collected as
/// [`Warning`](crate::diagnostics::Warning)s instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// A required attribute is absent (e.g. `img` without `src`)
    MissingAttribute {
        element: String,
        attribute: String,
        fragment: String,
    },
    /// The markup does not have the shape the adapter relies on
    UnexpectedTree { message: String, fragment: String },
    /// An element node showed up but the element cursor was already exhausted
    CursorUnderflow { fragment: String },
    /// The node cursor and the element cursor point at different elements
    CursorDesync { expected: String, found: String },
    /// The block factory was handed something it cannot map
    InvalidInput(String),
    /// No site adapter registered under that name
    SiteNotFound(String),
    /// No site adapter accepts that URL
    UnsupportedUrl(String),
    /// Error while reading or writing JSON payloads
    Serialization(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::MissingAttribute {
                element,
                attribute,
                fragment,
            } => write!(
                f,
                "Attribute missing: <{element}> has no '{attribute}' in {fragment}"
            ),
            ConvertError::UnexpectedTree { message, fragment } => {
                write!(f, "Unexpected node-tree: {message} in {fragment}")
            }
            ConvertError::CursorUnderflow { fragment } => write!(
                f,
                "Element cursor underflow: no element left for node {fragment}"
            ),
            ConvertError::CursorDesync { expected, found } => write!(
                f,
                "Element cursor out of sync: expected {expected}, found {found}"
            ),
            ConvertError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            ConvertError::SiteNotFound(name) => write!(f, "Site '{name}' not found"),
            ConvertError::UnsupportedUrl(url) => write!(f, "'{url}' is not a supported URL"),
            ConvertError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Serialization(err.to_string())
    }
}

/// Failure reported by a [`PageApi`](crate::publish::PageApi) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP-like status code, when the remote side returned one
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{status}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors that abort a publish run.
///
/// Failed child appends are not errors: they are aggregated into
/// [`PublishOutcome::failures`](crate::publish::PublishOutcome).
#[derive(Debug, Clone, PartialEq)]
pub enum PublishError {
    /// The page descriptor references an id it does not contain
    MissingRecord(String),
    /// Page creation failed, nothing exists remotely
    CreatePage(ApiError),
    /// Listing the new page's children failed
    ListChildren { page_id: String, source: ApiError },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::MissingRecord(id) => write!(f, "No record for block id '{id}'"),
            PublishError::CreatePage(err) => write!(f, "Failed to create page: {err}"),
            PublishError::ListChildren { page_id, source } => {
                write!(f, "Failed to list children of page '{page_id}': {source}")
            }
        }
    }
}

impl std::error::Error for PublishError {}
