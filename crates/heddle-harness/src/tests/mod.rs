//! Crate-level tests for heddle-harness.

mod behaviour;
