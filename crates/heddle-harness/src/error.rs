//! Scenario failures and their classification.
//!
//! Each pipeline stage has its own error type. [`ScenarioError`] records the
//! stage a run stopped in together with that typed cause, and
//! [`ScenarioError::category`] folds the cause into the coarse taxonomy test
//! authors reason about.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use heddle_config::OrthoError;
use heddle_providers::{InvocationError, SelectionError};
use heddle_workspace::WorkspaceError;

use crate::analyzer::AnalyzerError;
use crate::apply::ApplyError;
use crate::telemetry::TelemetryError;
use crate::verify::VerificationError;

/// Options could not be prepared for a scenario run.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A configuration layer failed to load or merge.
    #[error("failed to load harness configuration: {0}")]
    Load(#[source] Arc<OrthoError>),
    /// The configured telemetry could not be installed.
    #[error("failed to initialise harness telemetry: {0}")]
    Telemetry(#[source] Arc<TelemetryError>),
}

impl From<Arc<OrthoError>> for ConfigError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Load(source)
    }
}

impl From<TelemetryError> for ConfigError {
    fn from(source: TelemetryError) -> Self {
        Self::Telemetry(Arc::new(source))
    }
}

/// Pipeline stage in which a scenario stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioStage {
    /// Loading options.
    Configure,
    /// Building and compiling the workspace.
    Build,
    /// Resolving the target unit's locator.
    Locate,
    /// Running the provider.
    Invoke,
    /// Picking a transformation or checking candidate titles.
    Select,
    /// Applying the selected transformation.
    Apply,
    /// Comparing the workspace with the expected final state.
    Verify,
}

impl fmt::Display for ScenarioStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Locate => "locate",
            Self::Invoke => "invoke",
            Self::Select => "select",
            Self::Apply => "apply",
            Self::Verify => "verify",
        };
        f.write_str(label)
    }
}

/// Coarse classification of a scenario failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The scenario was declared incorrectly.
    Configuration,
    /// The input does not compile or the provider crashed.
    Input,
    /// The wanted transformation was not offered, or unexpected ones were.
    Selection,
    /// The transformation could not be applied.
    Application,
    /// The result differs from the expected final state.
    Verification,
}

/// Typed cause of a scenario failure.
#[derive(Debug, Clone, Error)]
pub enum ScenarioFailure {
    /// Options could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Workspace construction or target resolution failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    /// Provider invocation failed.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
    /// Selection or title validation failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// Applying the transformation failed.
    #[error(transparent)]
    Apply(#[from] ApplyError),
    /// The post-apply workspace differs from the expectation.
    #[error(transparent)]
    Verification(#[from] VerificationError),
    /// An analyzer assertion failed.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

impl ScenarioFailure {
    /// Classifies the failure.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_)
            | Self::Invocation(
                InvocationError::UnknownModule { .. } | InvocationError::UnitNotFound { .. },
            )
            | Self::Selection(SelectionError::EmptyExpectedTitles) => ErrorCategory::Configuration,
            Self::Workspace(WorkspaceError::Compiler(_))
            | Self::Invocation(_)
            | Self::Apply(ApplyError::RealizationFaulted { .. }) => ErrorCategory::Input,
            Self::Workspace(_) => ErrorCategory::Configuration,
            Self::Selection(_) => ErrorCategory::Selection,
            Self::Apply(_) => ErrorCategory::Application,
            Self::Verification(_) | Self::Analyzer(_) => ErrorCategory::Verification,
        }
    }
}

/// A scenario stopped before reaching its final state.
#[derive(Debug, Clone, Error)]
#[error("scenario failed during {stage}: {failure}")]
pub struct ScenarioError {
    stage: ScenarioStage,
    #[source]
    failure: ScenarioFailure,
}

impl ScenarioError {
    /// Records `failure` as the reason the run stopped in `stage`.
    #[must_use]
    pub fn new(stage: ScenarioStage, failure: impl Into<ScenarioFailure>) -> Self {
        Self {
            stage,
            failure: failure.into(),
        }
    }

    /// Stage the run stopped in.
    #[must_use]
    pub const fn stage(&self) -> ScenarioStage {
        self.stage
    }

    /// Typed cause.
    #[must_use]
    pub const fn failure(&self) -> &ScenarioFailure {
        &self.failure
    }

    /// Consumes the error, returning its cause.
    #[must_use]
    pub fn into_failure(self) -> ScenarioFailure {
        self.failure
    }

    /// Classifies the failure.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.failure.category()
    }
}

/// Attaches a stage to stage-specific results.
pub(crate) trait AtStage<T> {
    fn at(self, stage: ScenarioStage) -> Result<T, ScenarioError>;
}

impl<T, E> AtStage<T> for Result<T, E>
where
    E: Into<ScenarioFailure>,
{
    fn at(self, stage: ScenarioStage) -> Result<T, ScenarioError> {
        self.map_err(|error| ScenarioError::new(stage, error))
    }
}
