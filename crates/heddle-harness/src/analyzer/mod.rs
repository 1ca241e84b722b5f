//! Assertions over the findings an analysis provider reports.

use thiserror::Error;
use tracing::debug;

use heddle_providers::{AnalysisProvider, Finding, collect_findings};
use heddle_workspace::{
    ArtifactReference, Compiler, DEFAULT_UNIT_PATH, MARKER_START, ModuleDescriptor,
    SourceUnitChange, TargetUnit, TextSpan, Workspace, WorkspaceBuilder, WorkspaceError,
    resolve_target,
};

use crate::error::{AtStage, ScenarioError, ScenarioStage};
use crate::options::ScenarioOptions;
use crate::scenario::infer_modules;

const ANALYZER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::analyzer");

fn render(findings: &[String]) -> String {
    if findings.is_empty() {
        "(none)".to_owned()
    } else {
        findings.join("; ")
    }
}

/// Failures raised by analyzer assertions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerError {
    /// No finding with the expected identifier was reported at the location.
    #[error("finding {id} not reported at {locator}; reported there: {}", render(.reported))]
    FindingNotFound {
        /// Expected identifier.
        id: String,
        /// Description of the locator.
        locator: String,
        /// Findings reported at the location.
        reported: Vec<String>,
    },

    /// Findings the scenario rules out were reported.
    #[error("unexpected findings: {}", render(.findings))]
    UnexpectedFinding {
        /// The offending findings.
        findings: Vec<String>,
    },
}

/// A scenario that runs an analysis provider and asserts on its findings.
///
/// ```ignore
/// AnalyzerScenario::single_unit("export Widget\n[|local Helper|]")?
///     .has_finding(&compiler, &analyzer, "HA0001")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalyzerScenario {
    modules: Vec<ModuleDescriptor>,
    changes: Vec<SourceUnitChange>,
    references: Vec<ArtifactReference>,
    options: ScenarioOptions,
}

impl AnalyzerScenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single unit at the default path. Markup carrying markers makes the
    /// unit the target; plain code is analysed without a location.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the markers do not parse.
    pub fn single_unit(markup: &str) -> Result<Self, ScenarioError> {
        let change = if markup.contains(MARKER_START) {
            SourceUnitChange::target_unchanged(markup, DEFAULT_UNIT_PATH)
        } else {
            SourceUnitChange::unchanged(markup, DEFAULT_UNIT_PATH)
        };
        Ok(Self::new().with_change(change.at(ScenarioStage::Locate)?))
    }

    /// A single unit located by a one-based line.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the default path is rejected.
    pub fn single_unit_at_line(code: &str, line: usize) -> Result<Self, ScenarioError> {
        let change = SourceUnitChange::target_at_line(code, line, code, DEFAULT_UNIT_PATH)
            .at(ScenarioStage::Locate)?;
        Ok(Self::new().with_change(change))
    }

    /// A single unit located by an explicit span.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the default path is rejected.
    pub fn single_unit_at_span(code: &str, span: TextSpan) -> Result<Self, ScenarioError> {
        let change = SourceUnitChange::target_at_span(code, span, code, DEFAULT_UNIT_PATH)
            .at(ScenarioStage::Locate)?;
        Ok(Self::new().with_change(change))
    }

    /// Declares a module.
    #[must_use]
    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        self.modules.push(module);
        self
    }

    /// Declares a unit.
    #[must_use]
    pub fn with_change(mut self, change: SourceUnitChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Adds an extra reference to every module.
    #[must_use]
    pub fn with_reference(mut self, reference: ArtifactReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Replaces the scenario options.
    #[must_use]
    pub fn with_options(mut self, options: ScenarioOptions) -> Self {
        self.options = options;
        self
    }

    /// Enables or disables the input-error check.
    #[must_use]
    pub const fn with_input_error_check(mut self, enabled: bool) -> Self {
        self.options.fail_on_input_errors = enabled;
        self
    }

    fn build(&self, compiler: &dyn Compiler) -> Result<Workspace, ScenarioError> {
        let modules = if self.modules.is_empty() {
            infer_modules(&self.changes)
        } else {
            self.modules.clone()
        };
        WorkspaceBuilder::new(compiler)
            .with_references(self.references.clone())
            .build(&modules, &self.changes)
            .at(ScenarioStage::Build)
    }

    fn target(&self, workspace: &Workspace) -> Result<Option<TargetUnit>, ScenarioError> {
        if self.changes.iter().any(SourceUnitChange::is_target) {
            resolve_target(workspace, &self.changes)
                .map(Some)
                .at(ScenarioStage::Locate)
        } else {
            Ok(None)
        }
    }

    fn analyse(
        &self,
        workspace: &Workspace,
        analyzer: &dyn AnalysisProvider,
    ) -> Result<Vec<Finding>, ScenarioError> {
        let mut findings = Vec::new();
        for module in workspace.compile_order() {
            findings.extend(
                collect_findings(workspace, module, analyzer, self.options.invocation())
                    .at(ScenarioStage::Invoke)?,
            );
        }
        debug!(
            target: ANALYZER_TARGET,
            analyzer = analyzer.name(),
            count = findings.len(),
            "analysed workspace"
        );
        Ok(findings)
    }

    /// Runs the analyzer over every module, in compile order.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] from the build or invoke stage.
    pub fn findings(
        &self,
        compiler: &dyn Compiler,
        analyzer: &dyn AnalysisProvider,
    ) -> Result<Vec<Finding>, ScenarioError> {
        let workspace = self.build(compiler)?;
        self.analyse(&workspace, analyzer)
    }

    /// Asserts that the analyzer runs to completion without faulting.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] from the build or invoke stage.
    pub fn no_fault(
        &self,
        compiler: &dyn Compiler,
        analyzer: &dyn AnalysisProvider,
    ) -> Result<(), ScenarioError> {
        self.findings(compiler, analyzer).map(|_| ())
    }

    /// Asserts that a finding with identifier `id` is reported at the
    /// target location, returning every finding reported there.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::FindingNotFound`] at the verify stage when no
    /// such finding exists, and a configuration error when the scenario has
    /// no target unit.
    pub fn has_finding(
        &self,
        compiler: &dyn Compiler,
        analyzer: &dyn AnalysisProvider,
        id: &str,
    ) -> Result<Vec<Finding>, ScenarioError> {
        let workspace = self.build(compiler)?;
        let Some(target) = self.target(&workspace)? else {
            return Err(ScenarioError::new(
                ScenarioStage::Locate,
                WorkspaceError::NoTargetUnit,
            ));
        };
        let located: Vec<Finding> = self
            .analyse(&workspace, analyzer)?
            .into_iter()
            .filter(|finding| at_target(finding, &target))
            .collect();
        if located.iter().any(|finding| finding.id() == id) {
            Ok(located)
        } else {
            Err(ScenarioError::new(
                ScenarioStage::Verify,
                AnalyzerError::FindingNotFound {
                    id: id.to_owned(),
                    locator: target.locator().describe(),
                    reported: located.iter().map(ToString::to_string).collect(),
                },
            ))
        }
    }

    /// Asserts that none of `ids` is reported. When the scenario has a
    /// target unit only findings at its location count.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::UnexpectedFinding`] at the verify stage
    /// listing the offending findings.
    pub fn no_finding<S: AsRef<str>>(
        &self,
        compiler: &dyn Compiler,
        analyzer: &dyn AnalysisProvider,
        ids: &[S],
    ) -> Result<(), ScenarioError> {
        let workspace = self.build(compiler)?;
        let target = self.target(&workspace)?;
        let unexpected: Vec<String> = self
            .analyse(&workspace, analyzer)?
            .iter()
            .filter(|finding| target.as_ref().is_none_or(|target| at_target(finding, target)))
            .filter(|finding| ids.iter().any(|id| id.as_ref() == finding.id()))
            .map(ToString::to_string)
            .collect();
        if unexpected.is_empty() {
            Ok(())
        } else {
            Err(ScenarioError::new(
                ScenarioStage::Verify,
                AnalyzerError::UnexpectedFinding {
                    findings: unexpected,
                },
            ))
        }
    }
}

fn at_target(finding: &Finding, target: &TargetUnit) -> bool {
    finding
        .location()
        .is_some_and(|(unit, span)| unit == target.key() && target.location().matches(&span))
}
