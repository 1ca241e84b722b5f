//! Crate-level tests for heddle-providers.
