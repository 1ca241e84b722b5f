//! Checks the post-apply workspace against the declared final states.
//!
//! Every declared change is matched to a unit by module, folders and name.
//! Checks run in declaration order and stop at the first failure.

mod error;

use tracing::debug;

use heddle_config::LineEndingPolicy;
use heddle_workspace::{SourceUnit, SourceUnitChange, UnitKey, UnitState, Workspace};

use crate::diff::{DiffReporter, ExternalDiffTool, InlineDiff};

pub use error::VerificationError;

const VERIFY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::verify");

/// Line placed between units when a module is compared as one text.
pub const FILE_SEPARATOR: &str = "-------- NEXT FILE --------";

/// Compares workspace text with expected text.
#[derive(Debug)]
pub struct Verifier {
    line_endings: LineEndingPolicy,
    reporter: Box<dyn DiffReporter>,
    external: Option<ExternalDiffTool>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(LineEndingPolicy::default())
    }
}

impl Verifier {
    /// Creates a verifier with inline diffs and no external tool.
    #[must_use]
    pub fn new(line_endings: LineEndingPolicy) -> Self {
        Self {
            line_endings,
            reporter: Box::new(InlineDiff),
            external: None,
        }
    }

    /// Replaces the diff renderer.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl DiffReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Launches `tool` on every mismatch.
    #[must_use]
    pub fn with_external_tool(mut self, tool: Option<ExternalDiffTool>) -> Self {
        self.external = tool;
        self
    }

    /// Line-ending policy applied before comparison.
    #[must_use]
    pub const fn line_endings(&self) -> LineEndingPolicy {
        self.line_endings
    }

    /// Checks every declared change against `workspace`.
    ///
    /// # Errors
    ///
    /// Returns the first [`VerificationError`] in declaration order.
    pub fn verify(
        &self,
        workspace: &Workspace,
        changes: &[SourceUnitChange],
    ) -> Result<(), VerificationError> {
        for change in changes {
            self.verify_change(workspace, change)?;
        }
        debug!(
            target: VERIFY_TARGET,
            units = changes.len(),
            version = workspace.version(),
            "verified workspace"
        );
        Ok(())
    }

    fn verify_change(
        &self,
        workspace: &Workspace,
        change: &SourceUnitChange,
    ) -> Result<(), VerificationError> {
        let key = change.key();
        let unit = workspace.unit(key);
        match (change.state(), unit, change.final_text()) {
            (UnitState::Deleted, None, _) => Ok(()),
            (UnitState::Deleted, Some(unit), _) => Err(VerificationError::UnitNotDeleted {
                unit: key.to_string(),
                residual_text: unit.text().to_owned(),
            }),
            (_, None, _) => Err(VerificationError::UnitMissing {
                unit: key.to_string(),
            }),
            (_, Some(unit), expected) => {
                self.compare(key, expected.unwrap_or_default(), unit.text())
            }
        }
    }

    /// Compares the target unit followed by every other unit of its module,
    /// in descending name order, against a single expected text. Units are
    /// joined by a line holding [`FILE_SEPARATOR`].
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::UnitMissing`] when the target no longer
    /// exists and [`VerificationError::TransformationResultMismatch`] when
    /// the combined text differs.
    pub fn verify_combined(
        &self,
        workspace: &Workspace,
        target: &UnitKey,
        expected: &str,
    ) -> Result<(), VerificationError> {
        let actual = combined_text(workspace, target).ok_or_else(|| {
            VerificationError::UnitMissing {
                unit: target.to_string(),
            }
        })?;
        self.compare(target, expected, &actual)
    }

    fn compare(
        &self,
        key: &UnitKey,
        expected: &str,
        actual: &str,
    ) -> Result<(), VerificationError> {
        let expected = self.line_endings.apply(expected);
        let actual = self.line_endings.apply(actual);
        if expected == actual {
            return Ok(());
        }
        debug!(target: VERIFY_TARGET, unit = %key, "text mismatch");
        if let Some(tool) = &self.external {
            tool.launch(&expected, &actual);
        }
        let diff = self.reporter.render(&expected, &actual);
        Err(VerificationError::TransformationResultMismatch {
            unit: key.to_string(),
            expected,
            actual,
            diff,
        })
    }
}

/// Joins the target unit with the rest of its module, or `None` when the
/// target does not exist.
#[must_use]
pub fn combined_text(workspace: &Workspace, target: &UnitKey) -> Option<String> {
    let mut text = workspace.unit(target)?.text().to_owned();
    let mut others: Vec<&SourceUnit> = workspace
        .module(target.module())
        .into_iter()
        .flat_map(|module| module.units())
        .filter(|unit| unit.key() != target)
        .collect();
    others.sort_by(|left, right| {
        right
            .key()
            .name()
            .cmp(left.key().name())
            .then_with(|| right.key().cmp(left.key()))
    });
    for unit in others {
        text.push('\n');
        text.push_str(FILE_SEPARATOR);
        text.push('\n');
        text.push_str(unit.text());
    }
    Some(text)
}
