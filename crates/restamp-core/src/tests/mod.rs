//! Crate-level tests for restamp-core.

mod behaviour;
mod unit;
