//! Markdown extraction tests
//!
//! Extracted documents are parsed back with comrak and checked on the
//! resulting AST rather than on exact strings.

mod extract;
