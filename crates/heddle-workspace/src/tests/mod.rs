//! Crate-level tests for heddle-workspace.

mod behaviour;
