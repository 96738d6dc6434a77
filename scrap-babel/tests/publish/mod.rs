//! Publish bridge tests
//!
//! Runs the create / list / append chain against an in-memory API that
//! records every call and can be told to fail.

mod bridge;
