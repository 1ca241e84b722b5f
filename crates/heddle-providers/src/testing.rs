//! Scripted providers for tests.
//!
//! The real providers live outside the harness. These doubles cover the
//! behaviours scenarios need to exercise: fixed offers, faults, import
//! insertion and unit moves over the declaration language understood by
//! [`heddle_workspace::testing::DeclarationCompiler`], and a simple analyzer.

use std::cell::Cell;

use heddle_workspace::testing::Statement;
use heddle_workspace::{ReferenceOrigin, Severity, UnitKey, Workspace, line_spans};

use crate::edit::{EditOperation, TextEdit};
use crate::finding::Finding;
use crate::provider::{
    AnalysisContext, AnalysisProvider, RefactoringContext, TransformationProvider,
};
use crate::transformation::{ProviderFault, StaticTransformation, Transformation};

/// Offers a fixed list of transformations and counts its invocations.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    offers: Vec<StaticTransformation>,
    invocations: Cell<usize>,
}

impl ScriptedProvider {
    /// Creates a provider that offers nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an offer.
    #[must_use]
    pub fn offering(mut self, transformation: StaticTransformation) -> Self {
        self.offers.push(transformation);
        self
    }

    /// Adds an offer with no operations under each title.
    #[must_use]
    pub fn offering_titles<I, S>(self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        titles.into_iter().fold(self, |provider, title| {
            provider.offering(StaticTransformation::new(title, Vec::new()))
        })
    }

    /// Number of times the provider ran.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.get()
    }
}

impl TransformationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn compute(&self, context: &mut RefactoringContext<'_>) -> Result<(), ProviderFault> {
        self.invocations.set(self.invocations.get() + 1);
        for offer in &self.offers {
            context.register(offer.clone());
        }
        Ok(())
    }
}

/// Fails every invocation with a fixed message.
#[derive(Debug, Clone)]
pub struct FaultingProvider {
    message: String,
}

impl FaultingProvider {
    /// Creates a provider that fails with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TransformationProvider for FaultingProvider {
    fn name(&self) -> &str {
        "faulting"
    }

    fn compute(&self, _context: &mut RefactoringContext<'_>) -> Result<(), ProviderFault> {
        Err(ProviderFault::new(self.message.clone()))
    }
}

impl AnalysisProvider for FaultingProvider {
    fn name(&self) -> &str {
        "faulting"
    }

    fn analyze(&self, _context: &mut AnalysisContext<'_>) -> Result<(), ProviderFault> {
        Err(ProviderFault::new(self.message.clone()))
    }
}

/// Inserts `import Module` at the top of a unit.
#[derive(Debug, Clone)]
struct AddImport {
    title: String,
    unit: UnitKey,
    module: String,
}

impl Transformation for AddImport {
    fn title(&self) -> &str {
        &self.title
    }

    fn equivalence_key(&self) -> Option<&str> {
        Some("add-import")
    }

    fn operations(&self, workspace: &Workspace) -> Result<Vec<EditOperation>, ProviderFault> {
        if workspace.unit(&self.unit).is_none() {
            return Err(ProviderFault::new(format!("unit '{}' vanished", self.unit)));
        }
        Ok(vec![EditOperation::EditText {
            unit: self.unit.clone(),
            edits: vec![TextEdit::insert_at(0, format!("import {}\n", self.module))],
        }])
    }
}

/// Offers `Import <Module>` when the located line uses a symbol that a
/// referenced but not yet imported module exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddImportProvider;

impl TransformationProvider for AddImportProvider {
    fn name(&self) -> &str {
        "add-import"
    }

    fn compute(&self, context: &mut RefactoringContext<'_>) -> Result<(), ProviderFault> {
        let unit = context.unit();
        let text = unit.text();
        let located = context.span();
        let symbols: Vec<&str> = line_spans(text)
            .into_iter()
            .filter(|line| line.intersects(&located))
            .filter_map(|line| match Statement::parse(line.slice(text).unwrap_or_default()) {
                Statement::Use(symbol) => Some(symbol),
                _ => None,
            })
            .collect();
        let imported: Vec<&str> = text
            .lines()
            .filter_map(|line| match Statement::parse(line) {
                Statement::Import(module) => Some(module),
                _ => None,
            })
            .collect();
        let Some(module) = context.workspace().module(unit.key().module()) else {
            return Err(ProviderFault::new("target module is missing"));
        };

        let mut offers = Vec::new();
        for reference in module.references() {
            let ReferenceOrigin::Module(exporter) = reference.origin() else {
                continue;
            };
            if imported.contains(&exporter.as_str()) {
                continue;
            }
            if symbols.iter().any(|symbol| reference.exports_symbol(symbol)) {
                offers.push(AddImport {
                    title: format!("Import {exporter}"),
                    unit: unit.key().clone(),
                    module: exporter.clone(),
                });
            }
        }
        for offer in offers {
            context.register(offer);
        }
        Ok(())
    }
}

/// Moves a unit to a new key.
#[derive(Debug, Clone)]
struct MoveUnit {
    title: String,
    from: UnitKey,
    to: UnitKey,
}

impl Transformation for MoveUnit {
    fn title(&self) -> &str {
        &self.title
    }

    fn operations(&self, workspace: &Workspace) -> Result<Vec<EditOperation>, ProviderFault> {
        let Some(unit) = workspace.unit(&self.from) else {
            return Err(ProviderFault::new(format!("unit '{}' vanished", self.from)));
        };
        Ok(vec![
            EditOperation::CreateUnit {
                unit: self.to.clone(),
                text: unit.text().to_owned(),
            },
            EditOperation::DeleteUnit {
                unit: self.from.clone(),
            },
        ])
    }
}

/// Offers `Move to <destination>` for the target unit.
#[derive(Debug, Clone)]
pub struct MoveUnitProvider {
    destination: UnitKey,
}

impl MoveUnitProvider {
    /// Creates a provider moving the target to `destination`.
    #[must_use]
    pub const fn new(destination: UnitKey) -> Self {
        Self { destination }
    }
}

impl TransformationProvider for MoveUnitProvider {
    fn name(&self) -> &str {
        "move-unit"
    }

    fn compute(&self, context: &mut RefactoringContext<'_>) -> Result<(), ProviderFault> {
        let from = context.unit().key().clone();
        context.register(MoveUnit {
            title: format!("Move to {}", self.destination),
            from,
            to: self.destination.clone(),
        });
        Ok(())
    }
}

/// Identifier of findings reported by [`LocalDeclarationAnalyzer`].
pub const LOCAL_DECLARATION: &str = "HA0001";

/// Reports every `local` declaration as an informational finding.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDeclarationAnalyzer;

impl AnalysisProvider for LocalDeclarationAnalyzer {
    fn name(&self) -> &str {
        "local-declarations"
    }

    fn analyze(&self, context: &mut AnalysisContext<'_>) -> Result<(), ProviderFault> {
        let module = context.module();
        for unit in module.units() {
            let text = unit.text();
            for line in line_spans(text) {
                let Statement::Local(name) = Statement::parse(line.slice(text).unwrap_or_default())
                else {
                    continue;
                };
                context.report(
                    Finding::new(
                        LOCAL_DECLARATION,
                        Severity::Info,
                        format!("'{name}' is local to its module"),
                    )
                    .at(unit.key().clone(), line),
                );
            }
        }
        Ok(())
    }
}
