//! Structured telemetry for harness runs.
//!
//! Scenario stages emit `debug!` events under `heddle_harness::*` targets.
//! [`initialise`] routes them to stderr in the format chosen by
//! [`HarnessConfig::log_format`]. [`crate::ScenarioOptions::load_with_args`]
//! calls it, so loading options is enough to see pipeline events.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use heddle_config::{HarnessConfig, LogFormat};

static SUBSCRIBER_INSTALLED: OnceCell<LogFormat> = OnceCell::new();

/// Proof that harness events are routed to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Format chosen by the run that installed the subscriber.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression does not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber was installed outside the harness.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Validates the configured filter and installs the subscriber on first use.
///
/// The filter is checked on every call. The subscriber itself is global, so
/// the first successful call fixes its format and filter for the process.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter does not parse and
/// [`TelemetryError::Subscriber`] when a foreign subscriber already owns the
/// global slot.
pub fn initialise(config: &HarnessConfig) -> Result<TelemetryHandle, TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let installed = SUBSCRIBER_INSTALLED.get_or_try_init(|| {
        let format = config.log_format();
        tracing::subscriber::set_global_default(subscriber(filter, format))
            .map_err(TelemetryError::Subscriber)?;
        Ok::<_, TelemetryError>(format)
    })?;
    Ok(TelemetryHandle { format: *installed })
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn subscriber(filter: EnvFilter, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    }
}
