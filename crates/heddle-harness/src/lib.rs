//! Scenario harness for source-to-source transformation providers.
//!
//! A scenario declares modules and source units, builds them into a compiled
//! [`heddle_workspace::Workspace`], runs a provider at a located span,
//! selects one of the offered transformations, applies it and compares every
//! declared unit with its expected final text.
//!
//! ```ignore
//! use heddle_harness::RefactoringScenario;
//!
//! RefactoringScenario::new()
//!     .with_modules([core, app])
//!     .with_changes(changes)
//!     .select_title("Import Core")
//!     .run(&compiler, &provider)?;
//! ```
//!
//! Failures are [`ScenarioError`]s naming the stage that stopped the run and
//! the typed cause; [`ScenarioError::category`] classifies them.

mod analyzer;
mod apply;
mod diff;
mod error;
mod options;
mod scenario;
pub mod telemetry;
mod verify;

pub use analyzer::{AnalyzerError, AnalyzerScenario};
pub use apply::{AppliedChanges, ApplyError, apply_text_edits, apply_transformation};
pub use diff::{DiffReporter, ExternalDiffTool, InlineDiff};
pub use error::{
    ConfigError, ErrorCategory, ScenarioError, ScenarioFailure, ScenarioStage,
};
pub use options::ScenarioOptions;
pub use scenario::RefactoringScenario;
pub use scenario::pipeline::{Applied, Built, Invoked, Located, Selected, Verified};
pub use verify::{FILE_SEPARATOR, VerificationError, Verifier, combined_text};

#[cfg(test)]
mod tests;
