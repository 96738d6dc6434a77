//! Intermediate Representation (IR) between the DOM tokenizer and the block factory.
//!
//! The tokenizer classifies markup into [`nodes::IntermediateBlock`]s; the
//! block factory turns those into API payloads. Keeping the two apart lets
//! the factory be tested without any HTML.

pub mod nodes;
