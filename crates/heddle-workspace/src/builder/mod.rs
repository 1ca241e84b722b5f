//! Builds a [`Workspace`] from module descriptors and declared changes.
//!
//! Building happens in a fixed order:
//!
//! 1. one module per descriptor, each with its own language options;
//! 2. every declared unit that exists before the transformation is added with
//!    its initial text;
//! 3. modules are ordered so each follows its dependencies, failing fast on
//!    cycles and unknown names;
//! 4. each module imports the foundation references, any caller-supplied
//!    references and the artefacts of its dependencies, then compiles once.

mod resolve;

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::change::{SourceUnitChange, UnitState};
use crate::compiler::{CompileRequest, Compiler};
use crate::error::WorkspaceError;
use crate::module::ModuleDescriptor;
use crate::reference::{ArtifactReference, foundation_references};
use crate::target::{TargetUnit, resolve_target};
use crate::workspace::{Module, SourceUnit, Workspace};

const BUILD_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::builder");

/// Assembles and compiles workspaces against a [`Compiler`].
pub struct WorkspaceBuilder<'c> {
    compiler: &'c dyn Compiler,
    references: Vec<ArtifactReference>,
}

impl<'c> WorkspaceBuilder<'c> {
    /// Creates a builder that compiles with `compiler`.
    #[must_use]
    pub fn new(compiler: &'c dyn Compiler) -> Self {
        Self {
            compiler,
            references: Vec::new(),
        }
    }

    /// Adds a reference imported by every module.
    #[must_use]
    pub fn with_reference(mut self, reference: ArtifactReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Adds several references imported by every module.
    #[must_use]
    pub fn with_references(
        mut self,
        references: impl IntoIterator<Item = ArtifactReference>,
    ) -> Self {
        self.references.extend(references);
        self
    }

    /// Builds and compiles the workspace.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkspaceError`] when the declarations are inconsistent,
    /// the module graph cannot be ordered or the compiler fails.
    pub fn build(
        &self,
        descriptors: &[ModuleDescriptor],
        changes: &[SourceUnitChange],
    ) -> Result<Workspace, WorkspaceError> {
        let declared = self.declare_modules(descriptors)?;
        let mut workspace = Workspace::default();
        for descriptor in declared.values() {
            workspace.add_module(Module::new(descriptor.clone()));
        }
        add_units(&mut workspace, changes)?;

        let order = resolve::compile_order(&declared)?;
        self.compile_all(&mut workspace, &order)?;
        Ok(workspace)
    }

    /// Builds the workspace and resolves the target unit's locator.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::build`] plus those of target resolution:
    /// [`WorkspaceError::NoTargetUnit`], [`WorkspaceError::MultipleTargetUnits`]
    /// and [`WorkspaceError::Locate`].
    pub fn build_with_target(
        &self,
        descriptors: &[ModuleDescriptor],
        changes: &[SourceUnitChange],
    ) -> Result<(Workspace, TargetUnit), WorkspaceError> {
        let workspace = self.build(descriptors, changes)?;
        let target = resolve_target(&workspace, changes)?;
        debug!(
            target: BUILD_TARGET,
            unit = %target.key(),
            location = %target.location(),
            "resolved target unit"
        );
        Ok((workspace, target))
    }

    fn declare_modules(
        &self,
        descriptors: &[ModuleDescriptor],
    ) -> Result<BTreeMap<String, ModuleDescriptor>, WorkspaceError> {
        let mut declared = BTreeMap::new();
        for descriptor in descriptors {
            if let Some(language) = descriptor.options().language.as_deref()
                && !self.compiler.supports_language(language)
            {
                return Err(WorkspaceError::unsupported_language(
                    descriptor.name(),
                    language,
                ));
            }
            if declared
                .insert(descriptor.name().to_owned(), descriptor.clone())
                .is_some()
            {
                return Err(WorkspaceError::duplicate_module(descriptor.name()));
            }
        }
        Ok(declared)
    }

    fn compile_all(
        &self,
        workspace: &mut Workspace,
        order: &[String],
    ) -> Result<(), WorkspaceError> {
        let foundation = foundation_references(self.compiler);
        let mut artefacts: HashMap<String, ArtifactReference> = HashMap::new();

        for name in order {
            let Some(module) = workspace.module_mut(name) else {
                return Err(WorkspaceError::ModuleNotInWorkspace {
                    module: name.clone(),
                });
            };
            let mut references: Vec<ArtifactReference> = foundation.iter().cloned().collect();
            references.extend(self.references.iter().cloned());
            references.extend(
                module
                    .descriptor()
                    .dependencies()
                    .iter()
                    .filter_map(|dependency| artefacts.get(dependency).cloned()),
            );
            let units: Vec<SourceUnit> = module.units().cloned().collect();

            let compiled = self.compiler.compile(CompileRequest {
                descriptor: module.descriptor(),
                units: &units,
                references: &references,
            })?;
            debug!(
                target: BUILD_TARGET,
                module = %name,
                units = units.len(),
                references = references.len(),
                diagnostics = compiled.diagnostics().len(),
                "compiled module"
            );

            artefacts.insert(name.clone(), compiled.reference().clone());
            module.set_references(references);
            module.set_compiled(compiled);
            workspace.record_compiled(name);
        }
        Ok(())
    }
}

fn add_units(
    workspace: &mut Workspace,
    changes: &[SourceUnitChange],
) -> Result<(), WorkspaceError> {
    let mut seen = HashSet::new();
    for change in changes {
        let key = change.key();
        if workspace.module(key.module()).is_none() {
            return Err(WorkspaceError::unknown_module(key.module(), key.to_string()));
        }
        if !seen.insert(key.clone()) {
            return Err(WorkspaceError::duplicate_unit(key.to_string()));
        }
        if change.state() == UnitState::New {
            continue;
        }
        let text = change.initial_text().unwrap_or_default();
        workspace.insert_unit(SourceUnit::new(key.clone(), text));
    }
    Ok(())
}
