//! Per-scenario options derived from [`HarnessConfig`].

use std::ffi::OsString;

use tracing::debug;

use heddle_config::{HarnessConfig, LineEndingPolicy};
use heddle_providers::InvocationOptions;

use crate::diff::ExternalDiffTool;
use crate::error::ConfigError;
use crate::telemetry;
use crate::verify::Verifier;

const OPTIONS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::options");

/// Options consumed by the scenario pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOptions {
    /// Refuse to invoke providers on modules with compile errors.
    pub fail_on_input_errors: bool,
    /// Line-ending handling used by verification.
    pub line_endings: LineEndingPolicy,
    /// External diff tool launched on mismatches.
    pub diff_tool: Option<String>,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self::from_config(&HarnessConfig::default())
    }
}

impl ScenarioOptions {
    /// Maps loaded configuration onto the pipeline.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            fail_on_input_errors: config.fail_on_input_errors(),
            line_endings: config.line_endings(),
            diff_tool: config.diff_tool().map(str::to_owned),
        }
    }

    /// Loads configuration from `args`, the environment and any
    /// configuration file, installs the configured telemetry and maps the
    /// result onto the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a configuration layer cannot be
    /// loaded and [`ConfigError::Telemetry`] when the log filter is invalid
    /// or a foreign subscriber is already installed.
    pub fn load_with_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = HarnessConfig::load_with_args(args).map_err(ConfigError::from)?;
        telemetry::initialise(&config)?;
        debug!(
            target: OPTIONS_TARGET,
            log_format = %config.log_format(),
            fail_on_input_errors = config.fail_on_input_errors(),
            line_endings = %config.line_endings(),
            "loaded scenario options"
        );
        Ok(Self::from_config(&config))
    }

    /// Options passed to the invocation adapter.
    #[must_use]
    pub const fn invocation(&self) -> InvocationOptions {
        InvocationOptions {
            fail_on_input_errors: self.fail_on_input_errors,
        }
    }

    /// Verifier configured with these options.
    #[must_use]
    pub fn verifier(&self) -> Verifier {
        Verifier::new(self.line_endings)
            .with_external_tool(self.diff_tool.as_deref().map(ExternalDiffTool::new))
    }
}

#[cfg(test)]
mod tests {
    use heddle_config::InputErrorPolicy;

    use super::*;

    #[test]
    fn defaults_follow_the_configuration_defaults() {
        let options = ScenarioOptions::default();
        assert!(options.fail_on_input_errors);
        assert_eq!(options.line_endings, LineEndingPolicy::Auto);
        assert_eq!(options.diff_tool, None);
        assert!(options.invocation().fail_on_input_errors);
    }

    #[test]
    fn loading_without_layers_keeps_the_input_error_check() {
        let options =
            ScenarioOptions::load_with_args(["heddle"]).expect("configuration should load");
        assert!(options.fail_on_input_errors);
        assert!(options.invocation().fail_on_input_errors);
    }

    #[test]
    fn command_line_can_tolerate_input_errors() {
        let options = ScenarioOptions::load_with_args(["heddle", "--input-errors", "tolerate"])
            .expect("configuration should load");
        assert!(!options.fail_on_input_errors);
    }

    #[test]
    fn invalid_log_filters_stop_loading() {
        let error =
            ScenarioOptions::load_with_args(["heddle", "--log-filter", "heddle_harness=verbose"])
                .expect_err("filter should not parse");
        assert!(matches!(error, ConfigError::Telemetry(_)));
    }

    #[test]
    fn configuration_values_are_carried_over() {
        let config = HarnessConfig {
            input_errors: Some(InputErrorPolicy::Tolerate),
            line_endings: Some(LineEndingPolicy::Never),
            diff_tool: Some("meld".to_owned()),
            ..HarnessConfig::default()
        };
        let options = ScenarioOptions::from_config(&config);
        assert!(!options.invocation().fail_on_input_errors);
        assert_eq!(options.verifier().line_endings(), LineEndingPolicy::Never);
        assert_eq!(options.diff_tool.as_deref(), Some("meld"));
    }
}
