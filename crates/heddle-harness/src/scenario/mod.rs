//! Refactoring scenarios: declare a workspace, run a provider at a location,
//! apply one of its transformations and check the result.
//!
//! [`RefactoringScenario`] is the front door. It drives the typed stages in
//! [`pipeline`] in order and stops at the first failure.

pub mod pipeline;

use heddle_providers::{TransformationProvider, TransformationSelector};
use heddle_workspace::{
    ArtifactReference, Compiler, DEFAULT_UNIT_PATH, ModuleDescriptor, SourceUnitChange, TextSpan,
};

use crate::error::{AtStage, ScenarioError, ScenarioStage};
use crate::options::ScenarioOptions;

use self::pipeline::{Built, Invoked, Verified};

/// Declares one module per distinct module named by `changes`, in first-seen
/// order and without dependencies.
pub(crate) fn infer_modules(changes: &[SourceUnitChange]) -> Vec<ModuleDescriptor> {
    let mut modules: Vec<ModuleDescriptor> = Vec::new();
    for change in changes {
        if modules
            .iter()
            .all(|module| module.name() != change.module_name())
        {
            modules.push(ModuleDescriptor::new(change.module_name()));
        }
    }
    modules
}

/// A declared transformation scenario.
///
/// ```ignore
/// RefactoringScenario::single_unit("[|use Widget|]", "import Core\nuse Widget")?
///     .select_title("Import Core")
///     .run(&compiler, &provider)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RefactoringScenario {
    modules: Vec<ModuleDescriptor>,
    changes: Vec<SourceUnitChange>,
    selector: TransformationSelector,
    references: Vec<ArtifactReference>,
    options: ScenarioOptions,
}

impl RefactoringScenario {
    /// Creates an empty scenario that selects the first transformation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single target unit at the default path, located by markers.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the markers do not parse.
    pub fn single_unit(markup: &str, expected: &str) -> Result<Self, ScenarioError> {
        let change = SourceUnitChange::target_changed(markup, expected, DEFAULT_UNIT_PATH)
            .at(ScenarioStage::Locate)?;
        Ok(Self::new().with_change(change))
    }

    /// A single target unit at the default path, located by a one-based line.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the default path is rejected.
    pub fn single_unit_at_line(
        code: &str,
        line: usize,
        expected: &str,
    ) -> Result<Self, ScenarioError> {
        let change = SourceUnitChange::target_at_line(code, line, expected, DEFAULT_UNIT_PATH)
            .at(ScenarioStage::Locate)?;
        Ok(Self::new().with_change(change))
    }

    /// A single target unit at the default path, located by a span.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the default path is rejected.
    pub fn single_unit_at_span(
        code: &str,
        span: TextSpan,
        expected: &str,
    ) -> Result<Self, ScenarioError> {
        let change = SourceUnitChange::target_at_span(code, span, expected, DEFAULT_UNIT_PATH)
            .at(ScenarioStage::Locate)?;
        Ok(Self::new().with_change(change))
    }

    /// Declares a module. Without any, one module is declared per module
    /// named by the changes.
    #[must_use]
    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        self.modules.push(module);
        self
    }

    /// Declares several modules.
    #[must_use]
    pub fn with_modules(mut self, modules: impl IntoIterator<Item = ModuleDescriptor>) -> Self {
        self.modules.extend(modules);
        self
    }

    /// Declares a unit.
    #[must_use]
    pub fn with_change(mut self, change: SourceUnitChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Declares several units.
    #[must_use]
    pub fn with_changes(mut self, changes: impl IntoIterator<Item = SourceUnitChange>) -> Self {
        self.changes.extend(changes);
        self
    }

    /// Adds an extra reference imported by every module.
    #[must_use]
    pub fn with_reference(mut self, reference: ArtifactReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Selects the transformation at `index`.
    #[must_use]
    pub fn select_index(mut self, index: usize) -> Self {
        self.selector = TransformationSelector::ByIndex(index);
        self
    }

    /// Selects the first transformation titled `title`.
    #[must_use]
    pub fn select_title(mut self, title: impl Into<String>) -> Self {
        self.selector = TransformationSelector::by_title(title);
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

    /// Declared changes.
    #[must_use]
    pub fn changes(&self) -> &[SourceUnitChange] {
        &self.changes
    }

    /// Active selector.
    #[must_use]
    pub const fn selector(&self) -> &TransformationSelector {
        &self.selector
    }

    fn modules(&self) -> Vec<ModuleDescriptor> {
        if self.modules.is_empty() {
            infer_modules(&self.changes)
        } else {
            self.modules.clone()
        }
    }

    /// Builds, locates and invokes the provider.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the build, locate or invoke stage.
    pub fn invoke(
        &self,
        compiler: &dyn Compiler,
        provider: &dyn TransformationProvider,
    ) -> Result<Invoked, ScenarioError> {
        Built::build(compiler, &self.modules(), &self.changes, &self.references)?
            .locate(&self.changes)?
            .invoke(provider, self.options.invocation())
    }

    /// Runs the whole pipeline and verifies every declared change.
    ///
    /// # Errors
    ///
    /// Returns the first failure, tagged with the stage it occurred in.
    pub fn run(
        &self,
        compiler: &dyn Compiler,
        provider: &dyn TransformationProvider,
    ) -> Result<Verified, ScenarioError> {
        self.invoke(compiler, provider)?
            .select(&self.selector)?
            .apply()?
            .verify(&self.options.verifier(), &self.changes)
    }

    /// Runs the whole pipeline and compares the target unit, followed by the
    /// other units of its module, with `expected`.
    ///
    /// # Errors
    ///
    /// Returns the first failure, tagged with the stage it occurred in.
    pub fn run_combined(
        &self,
        compiler: &dyn Compiler,
        provider: &dyn TransformationProvider,
        expected: &str,
    ) -> Result<Verified, ScenarioError> {
        self.invoke(compiler, provider)?
            .select(&self.selector)?
            .apply()?
            .verify_combined(&self.options.verifier(), expected)
    }

    /// Asserts that the provider offers nothing at the target.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Select`] listing the offered titles, or
    /// earlier if the provider could not run.
    pub fn run_no_transformation(
        &self,
        compiler: &dyn Compiler,
        provider: &dyn TransformationProvider,
    ) -> Result<(), ScenarioError> {
        self.invoke(compiler, provider)?.expect_none()
    }

    /// Asserts that the provider offers exactly the `expected` titles, in any
    /// order.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Select`] on an empty expectation or a
    /// mismatch, or earlier if the provider could not run.
    pub fn run_expect_titles<S: AsRef<str>>(
        &self,
        compiler: &dyn Compiler,
        provider: &dyn TransformationProvider,
        expected: &[S],
    ) -> Result<(), ScenarioError> {
        self.invoke(compiler, provider)?.expect_titles(expected)
    }
}

#[cfg(test)]
mod tests;
