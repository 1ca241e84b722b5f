//! The scenario state machine.
//!
//! Each state owns the workspace and is consumed by the transition to the
//! next, so a run cannot skip a stage or revisit one. Every transition
//! reports its failure as a [`ScenarioError`] tagged with the stage.

use tracing::debug;

use heddle_providers::{
    InvocationOptions, ProposedTransformation, TransformationProvider, TransformationSelector,
    collect_transformations, verify_none, verify_titles,
};
use heddle_workspace::{
    ArtifactReference, Compiler, ModuleDescriptor, SourceUnitChange, TargetUnit, Workspace,
    WorkspaceBuilder, resolve_target,
};

use crate::apply::{AppliedChanges, apply_transformation};
use crate::error::{AtStage, ScenarioError, ScenarioStage};
use crate::verify::Verifier;

const PIPELINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::scenario");

/// A compiled workspace.
#[derive(Debug)]
pub struct Built {
    workspace: Workspace,
}

impl Built {
    /// Builds and compiles the declared modules and units.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Build`] with the builder's error.
    pub fn build(
        compiler: &dyn Compiler,
        modules: &[ModuleDescriptor],
        changes: &[SourceUnitChange],
        references: &[ArtifactReference],
    ) -> Result<Self, ScenarioError> {
        let workspace = WorkspaceBuilder::new(compiler)
            .with_references(references.iter().cloned())
            .build(modules, changes)
            .at(ScenarioStage::Build)?;
        debug!(
            target: PIPELINE_TARGET,
            modules = workspace.compile_order().len(),
            "built"
        );
        Ok(Self { workspace })
    }

    /// The compiled workspace.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Resolves the target unit's locator.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Locate`] when the changes do not name
    /// exactly one target or its locator does not resolve.
    pub fn locate(self, changes: &[SourceUnitChange]) -> Result<Located, ScenarioError> {
        let target = resolve_target(&self.workspace, changes).at(ScenarioStage::Locate)?;
        debug!(
            target: PIPELINE_TARGET,
            unit = %target.key(),
            location = %target.location(),
            "located"
        );
        Ok(Located {
            workspace: self.workspace,
            target,
        })
    }
}

/// A workspace with its target resolved.
#[derive(Debug)]
pub struct Located {
    workspace: Workspace,
    target: TargetUnit,
}

impl Located {
    /// The resolved target.
    #[must_use]
    pub const fn target(&self) -> &TargetUnit {
        &self.target
    }

    /// Runs the provider at the target.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Invoke`] with the adapter's error.
    pub fn invoke(
        self,
        provider: &dyn TransformationProvider,
        options: InvocationOptions,
    ) -> Result<Invoked, ScenarioError> {
        let candidates = collect_transformations(&self.workspace, &self.target, provider, options)
            .at(ScenarioStage::Invoke)?;
        Ok(Invoked {
            workspace: self.workspace,
            target: self.target,
            candidates,
        })
    }
}

/// The provider's candidates, in the order it offered them.
#[derive(Debug)]
pub struct Invoked {
    workspace: Workspace,
    target: TargetUnit,
    candidates: Vec<ProposedTransformation>,
}

impl Invoked {
    /// Offered transformations.
    #[must_use]
    pub fn candidates(&self) -> &[ProposedTransformation] {
        &self.candidates
    }

    /// Checks that nothing was offered.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Select`] listing the offered titles.
    pub fn expect_none(&self) -> Result<(), ScenarioError> {
        verify_none(&self.candidates).at(ScenarioStage::Select)
    }

    /// Checks the offered titles against `expected`, ignoring order.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Select`] on an empty expectation or a
    /// mismatch.
    pub fn expect_titles<S: AsRef<str>>(&self, expected: &[S]) -> Result<(), ScenarioError> {
        verify_titles(&self.candidates, expected).at(ScenarioStage::Select)
    }

    /// Picks the transformation to apply.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Select`] when nothing matches `selector`.
    pub fn select(self, selector: &TransformationSelector) -> Result<Selected, ScenarioError> {
        let chosen = selector
            .select(&self.candidates)
            .at(ScenarioStage::Select)?
            .clone();
        debug!(
            target: PIPELINE_TARGET,
            %selector,
            title = chosen.title(),
            "selected"
        );
        Ok(Selected {
            workspace: self.workspace,
            target: self.target,
            offered: titles(&self.candidates),
            chosen,
        })
    }
}

fn titles(candidates: &[ProposedTransformation]) -> Vec<String> {
    candidates
        .iter()
        .map(|candidate| candidate.title().to_owned())
        .collect()
}

/// The transformation chosen for application.
#[derive(Debug)]
pub struct Selected {
    workspace: Workspace,
    target: TargetUnit,
    offered: Vec<String>,
    chosen: ProposedTransformation,
}

impl Selected {
    /// The chosen transformation.
    #[must_use]
    pub const fn chosen(&self) -> &ProposedTransformation {
        &self.chosen
    }

    /// Applies the chosen transformation.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Apply`] with the applier's error.
    pub fn apply(mut self) -> Result<Applied, ScenarioError> {
        let applied =
            apply_transformation(&mut self.workspace, &self.chosen).at(ScenarioStage::Apply)?;
        Ok(Applied {
            workspace: self.workspace,
            target: self.target,
            offered: self.offered,
            applied,
        })
    }
}

/// The workspace after the transformation was applied.
#[derive(Debug)]
pub struct Applied {
    workspace: Workspace,
    target: TargetUnit,
    offered: Vec<String>,
    applied: AppliedChanges,
}

impl Applied {
    /// The transformed workspace.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Verifies every declared change.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Verify`] with the first mismatch.
    pub fn verify(
        self,
        verifier: &Verifier,
        changes: &[SourceUnitChange],
    ) -> Result<Verified, ScenarioError> {
        verifier
            .verify(&self.workspace, changes)
            .at(ScenarioStage::Verify)?;
        Ok(self.finish())
    }

    /// Verifies the target unit joined with the rest of its module against
    /// one expected text.
    ///
    /// # Errors
    ///
    /// Fails in [`ScenarioStage::Verify`] when the combined text differs.
    pub fn verify_combined(
        self,
        verifier: &Verifier,
        expected: &str,
    ) -> Result<Verified, ScenarioError> {
        verifier
            .verify_combined(&self.workspace, self.target.key(), expected)
            .at(ScenarioStage::Verify)?;
        Ok(self.finish())
    }

    fn finish(self) -> Verified {
        debug!(
            target: PIPELINE_TARGET,
            title = self.applied.title(),
            version = self.workspace.version(),
            "verified"
        );
        Verified {
            workspace: self.workspace,
            target: self.target,
            offered: self.offered,
            applied: self.applied,
        }
    }
}

/// A scenario that reached its expected final state.
#[derive(Debug)]
pub struct Verified {
    workspace: Workspace,
    target: TargetUnit,
    offered: Vec<String>,
    applied: AppliedChanges,
}

impl Verified {
    /// The final workspace.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The target the provider ran at.
    #[must_use]
    pub const fn target(&self) -> &TargetUnit {
        &self.target
    }

    /// Titles the provider offered, in order.
    #[must_use]
    pub fn offered(&self) -> &[String] {
        &self.offered
    }

    /// Summary of the applied change set.
    #[must_use]
    pub const fn applied(&self) -> &AppliedChanges {
        &self.applied
    }
}
