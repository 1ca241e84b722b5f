use crate::{InputErrorPolicy, LineEndingPolicy, LogFormat};

/// Default log filter expression used by the harness.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default logging format for the harness.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Scenarios reject inputs that already fail to compile unless told otherwise.
#[must_use]
pub const fn default_input_errors() -> InputErrorPolicy {
    InputErrorPolicy::Fail
}

/// Default line-ending policy applied during verification.
#[must_use]
pub const fn default_line_endings() -> LineEndingPolicy {
    LineEndingPolicy::Auto
}
