//! Site adapters and the markup machinery they share
//!
//! `html` holds the DOM helpers and the tokenizer, `zenn` and `note` locate
//! page parts on their sites, and `markdown` renders API blocks back to text.

pub mod common;
pub mod html;
pub mod markdown;
pub mod note;
pub mod zenn;

pub use markdown::{blocks_to_markdown, load_blocks};
pub use note::NoteArticle;
pub use zenn::{ZennArticle, ZennScrap};
