//! Flatten / reassemble tests
//!
//! Random list trees cut at the inline nesting limit and rebuilt again.
