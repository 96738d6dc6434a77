//! Converts zenn and note pages into block-based page payloads
//!
//!     This crate turns the HTML of an article or scrap page into the block model of a
//!     block-based page API, lays the blocks out as a page, and publishes that page through
//!     an injected API client. It can also render blocks back to Markdown.
//!
//!     This is a pure lib, that is, it powers the scrap cli but is shell agnostic: no code
//!     should be written that supposes a shell environment, be it to std print, env vars etc.
//!     Non-fatal problems are returned as [`Diagnostics`] and mirrored through `tracing`.
//!
//! Architecture
//!
//!     The pipeline is a straight line, each stage with its own module:
//!
//!     HTML ──parse──▶ DOM ──tokenize──▶ IR ──factory──▶ blocks ──flatten──▶ page ──publish──▶ API
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ConvertError, PublishError
//!     ├── diagnostics.rs          # Non-fatal warnings
//!     ├── options.rs              # Convert / publish / extract knobs
//!     ├── blocks.rs               # API block payloads (serde)
//!     ├── format.rs               # SiteFormat trait definition
//!     ├── registry.rs             # SiteRegistry for discovery and selection
//!     ├── page.rs                 # PageDescriptor and its builder
//!     ├── publish.rs              # Create / list / append bridge
//!     ├── transforms.rs           # One-call conversion entry points
//!     ├── formats
//!     │   ├── html                # DOM helpers, child cursor, tokenizer
//!     │   ├── zenn | note         # Site adapters
//!     │   ├── markdown            # Blocks → Markdown
//!     │   └── common              # Shared page-chrome lookups
//!     ├── ir                      # Intermediate Representation
//!     └── common                  # Rich text, block factory, flatten / reassemble
//!
//! Testing
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Two pieces carry the weight. The tokenizer (./formats/html/tokenizer.rs) walks element
//!     children with a lock-step pair of cursors, so text and elements are classified in source
//!     order while every element is accounted for exactly once. The flattener
//!     (./common/nested_to_flat.rs) cuts the resulting tree at the API's inline nesting limit,
//!     recording detached subtrees as flat records to be appended after the page exists.
//!     Its reverse (./common/flat_to_nested.rs) rebuilds the tree for offline rendering.
//!
//! Sites
//!
//!     Site specific capabilities are implemented with the SiteFormat trait: a name, a URL
//!     matcher, and a `convert` that locates the title, metadata and body and lays out the page.
//!     The tokenizer is shared, with a dialect switch for the handful of site specific elements.

pub mod blocks;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod formats;
pub mod options;
pub mod page;
pub mod publish;
pub mod registry;
pub mod transforms;

pub mod common;
pub mod ir;

pub use blocks::{Block, Icon, RichTextRun};
pub use common::nested_to_flat::{IdSource, SequentialIds, UuidSource};
pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use error::{ApiError, ConvertError, PublishError};
pub use format::{Conversion, SiteFormat};
pub use options::{ConvertOptions, ExtractOptions, PublishOptions};
pub use page::{PageDescriptor, ScrapInfo, SitePage};
pub use publish::{publish, PageApi, PublishOutcome, PublishStatus};
pub use registry::SiteRegistry;
