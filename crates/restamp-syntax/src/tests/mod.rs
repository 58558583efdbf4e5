//! Crate-level tests for restamp-syntax.
