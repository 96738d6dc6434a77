//! Contains logic for mapping between tokenized content, API blocks and flat records.

pub mod allow_lists;
pub mod block_factory;
pub mod flat_to_nested;
pub mod nested_to_flat;
pub mod rich_text;
