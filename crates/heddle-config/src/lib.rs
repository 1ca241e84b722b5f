//! Shared configuration for the heddle verification harness.
//!
//! Settings are layered by `ortho_config`: built-in defaults first, then a
//! TOML configuration file, then `HEDDLE_*` environment variables, and finally
//! command-line arguments. Every field is optional so an absent layer falls
//! through to the defaults exposed by the accessor methods.
//!
//! ```ignore
//! use heddle_config::HarnessConfig;
//!
//! let config = HarnessConfig::load_with_args(["cargo-test"])?;
//! assert!(config.fail_on_input_errors());
//! ```

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

mod defaults;
mod policy;

pub use defaults::{
    DEFAULT_LOG_FILTER, default_input_errors, default_line_endings, default_log_format,
};
pub use ortho_config::OrthoError;
pub use policy::{InputErrorPolicy, LineEndingPolicy};

/// Record layout written by the harness subscriber.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event with its fields flattened, for CI collectors.
    Json,
    /// Single line records for reading scenario output in a terminal.
    #[default]
    Compact,
}

/// Configuration consumed by the harness pipeline and its telemetry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HEDDLE")]
pub struct HarnessConfig {
    /// Tracing filter expression, for example `heddle_harness=debug`.
    pub log_filter: Option<String>,
    /// Output format for log records.
    pub log_format: Option<LogFormat>,
    /// Whether scenarios stop on input that already contains compile errors.
    pub input_errors: Option<InputErrorPolicy>,
    /// Line-ending handling applied before comparing text.
    pub line_endings: Option<LineEndingPolicy>,
    /// External comparison tool launched when verification finds a mismatch.
    pub diff_tool: Option<String>,
}

impl HarnessConfig {
    /// Loads configuration from the given argument list, the environment and
    /// any discovered configuration file.
    ///
    /// # Errors
    ///
    /// Returns the aggregated `ortho_config` error when a layer cannot be
    /// parsed or merged.
    pub fn load_with_args<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::load_from_iter(args)
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }

    /// Whether scenarios fail fast on inputs that do not compile.
    #[must_use]
    pub fn fail_on_input_errors(&self) -> bool {
        self.input_errors
            .unwrap_or_else(default_input_errors)
            .fails_fast()
    }

    /// Line-ending policy used by verification.
    #[must_use]
    pub fn line_endings(&self) -> LineEndingPolicy {
        self.line_endings.unwrap_or_else(default_line_endings)
    }

    /// Command for the external diff tool, if configured.
    #[must_use]
    pub fn diff_tool(&self) -> Option<&str> {
        self.diff_tool.as_deref().filter(|tool| !tool.trim().is_empty())
    }
}
