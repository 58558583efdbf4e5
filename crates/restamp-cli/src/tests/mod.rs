//! Crate-level tests for restamp-cli.

pub(crate) mod support;
