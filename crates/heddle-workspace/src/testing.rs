//! Test doubles for the compiler port.
//!
//! [`DeclarationCompiler`] understands a tiny line-oriented declaration
//! language, just enough to exercise dependency ordering, reference import
//! and diagnostics without a real toolchain:
//!
//! | line            | meaning                                              |
//! |-----------------|------------------------------------------------------|
//! | `export Name`   | declares `Name` and exports it to dependent modules  |
//! | `local Name`    | declares `Name` inside the module only               |
//! | `import Module` | imports the exports of a referenced module           |
//! | `use Name`      | references a symbol                                  |
//! | `null Name`     | dereferences a possibly-null value                   |
//! | `// ...`        | comment                                              |
//!
//! Diagnostics: `HD0001` (warning) for a `use` of a symbol exported by a
//! referenced module that is not imported, `HD0002` for an import of a module
//! that is not referenced, `HD0003` for an unrecognised line, `HD0004` for
//! `null` under strict null checks and `HD0005` for an unknown symbol. All but
//! `HD0001` are errors.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::compiler::{
    CompileDiagnostic, CompileRequest, CompiledModule, Compiler, CompilerError, Severity,
};
use crate::reference::{ArtifactReference, ReferenceOrigin};
use crate::span::line_spans;
use crate::workspace::SourceUnit;

/// Language identifier accepted by [`DeclarationCompiler`].
pub const DECLARATION_LANGUAGE: &str = "decl";

/// Diagnostic for a symbol that needs an import.
pub const MISSING_IMPORT: &str = "HD0001";
/// Diagnostic for an import of an unreferenced module.
pub const UNKNOWN_IMPORT: &str = "HD0002";
/// Diagnostic for an unrecognised line.
pub const UNRECOGNISED_LINE: &str = "HD0003";
/// Diagnostic for a null dereference under strict null checks.
pub const NULL_DEREFERENCE: &str = "HD0004";
/// Diagnostic for a symbol that cannot be found anywhere.
pub const UNKNOWN_SYMBOL: &str = "HD0005";

/// One statement of the declaration language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'t> {
    /// `export Name`
    Export(&'t str),
    /// `local Name`
    Local(&'t str),
    /// `import Module`
    Import(&'t str),
    /// `use Name`
    Use(&'t str),
    /// `null Name`
    Null(&'t str),
    /// Blank line or comment.
    Blank,
    /// Anything else.
    Unrecognised,
}

impl<'t> Statement<'t> {
    /// Parses one line.
    #[must_use]
    pub fn parse(line: &'t str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return Self::Blank;
        }
        let Some((keyword, rest)) = trimmed.split_once(char::is_whitespace) else {
            return Self::Unrecognised;
        };
        let operand = rest.trim();
        if operand.is_empty() || operand.contains(char::is_whitespace) {
            return Self::Unrecognised;
        }
        match keyword {
            "export" => Self::Export(operand),
            "local" => Self::Local(operand),
            "import" => Self::Import(operand),
            "use" => Self::Use(operand),
            "null" => Self::Null(operand),
            _ => Self::Unrecognised,
        }
    }
}

/// A compiler for the declaration language that records every compile.
#[derive(Debug, Default)]
pub struct DeclarationCompiler {
    compiled: RefCell<Vec<String>>,
    faulting: Option<String>,
}

impl DeclarationCompiler {
    /// Creates a compiler with an empty compile log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes compilation of `module` fail outright.
    #[must_use]
    pub fn failing_on(mut self, module: impl Into<String>) -> Self {
        self.faulting = Some(module.into());
        self
    }

    /// Names of compiled modules, in compile order.
    #[must_use]
    pub fn compiled_modules(&self) -> Vec<String> {
        self.compiled.borrow().clone()
    }
}

struct ModuleScope<'r> {
    declared: BTreeSet<String>,
    imported: Vec<&'r ArtifactReference>,
    ambient: Vec<&'r ArtifactReference>,
    modules: Vec<&'r ArtifactReference>,
}

impl<'r> ModuleScope<'r> {
    fn new(units: &[SourceUnit], references: &'r [ArtifactReference]) -> Self {
        let mut declared = BTreeSet::new();
        let mut import_names = BTreeSet::new();
        for unit in units {
            for line in unit.text().lines() {
                match Statement::parse(line) {
                    Statement::Export(name) | Statement::Local(name) => {
                        declared.insert(name.to_owned());
                    }
                    Statement::Import(module) => {
                        import_names.insert(module.to_owned());
                    }
                    _ => {}
                }
            }
        }
        let (modules, ambient): (Vec<_>, Vec<_>) = references
            .iter()
            .partition(|reference| matches!(reference.origin(), ReferenceOrigin::Module(_)));
        let imported = modules
            .iter()
            .copied()
            .filter(|reference| match reference.origin() {
                ReferenceOrigin::Module(name) => import_names.contains(name),
                _ => false,
            })
            .collect();
        Self {
            declared,
            imported,
            ambient,
            modules,
        }
    }

    fn resolves(&self, symbol: &str) -> bool {
        self.declared.contains(symbol)
            || self
                .ambient
                .iter()
                .chain(self.imported.iter())
                .any(|reference| reference.exports_symbol(symbol))
    }

    fn references_module(&self, module: &str) -> bool {
        self.modules.iter().any(|reference| {
            matches!(reference.origin(), ReferenceOrigin::Module(name) if name == module)
        })
    }

    fn exporter_of(&self, symbol: &str) -> Option<&'r ArtifactReference> {
        self.modules
            .iter()
            .copied()
            .find(|reference| reference.exports_symbol(symbol))
    }
}

fn check_unit(
    unit: &SourceUnit,
    scope: &ModuleScope<'_>,
    strict_null_checks: bool,
    diagnostics: &mut Vec<CompileDiagnostic>,
) {
    let text = unit.text();
    for span in line_spans(text) {
        let line = span.slice(text).unwrap_or_default();
        let diagnostic = match Statement::parse(line) {
            Statement::Export(_) | Statement::Local(_) | Statement::Blank => None,
            Statement::Import(module) if scope.references_module(module) => None,
            Statement::Import(module) => Some(CompileDiagnostic::new(
                UNKNOWN_IMPORT,
                Severity::Error,
                format!("module '{module}' is not referenced"),
            )),
            Statement::Use(symbol) if scope.resolves(symbol) => None,
            Statement::Use(symbol) => Some(scope.exporter_of(symbol).map_or_else(
                || {
                    CompileDiagnostic::new(
                        UNKNOWN_SYMBOL,
                        Severity::Error,
                        format!("unknown symbol '{symbol}'"),
                    )
                },
                |exporter| {
                    CompileDiagnostic::new(
                        MISSING_IMPORT,
                        Severity::Warning,
                        format!("symbol '{symbol}' requires 'import {exporter}'"),
                    )
                },
            )),
            Statement::Null(name) if strict_null_checks => Some(CompileDiagnostic::new(
                NULL_DEREFERENCE,
                Severity::Error,
                format!("'{name}' may be null"),
            )),
            Statement::Null(_) => None,
            Statement::Unrecognised => Some(CompileDiagnostic::new(
                UNRECOGNISED_LINE,
                Severity::Error,
                format!("unrecognised declaration '{}'", line.trim()),
            )),
        };
        if let Some(found) = diagnostic {
            diagnostics.push(found.at(unit.key().clone(), span));
        }
    }
}

impl Compiler for DeclarationCompiler {
    fn platform(&self) -> &str {
        "decl-test"
    }

    fn supports_language(&self, language: &str) -> bool {
        language == DECLARATION_LANGUAGE
    }

    fn foundation_references(&self) -> Vec<ArtifactReference> {
        vec![ArtifactReference::new(
            "decl-core",
            ReferenceOrigin::Foundation,
            ["Object", "String"],
        )]
    }

    fn compile(&self, request: CompileRequest<'_>) -> Result<CompiledModule, CompilerError> {
        let name = request.descriptor.name();
        if self.faulting.as_deref() == Some(name) {
            return Err(CompilerError::new(name, "scripted compiler failure"));
        }
        self.compiled.borrow_mut().push(name.to_owned());

        let scope = ModuleScope::new(request.units, request.references);
        let strict = request.descriptor.options().strict_null_checks;
        let mut diagnostics = Vec::new();
        let mut exports = BTreeSet::new();
        for unit in request.units {
            check_unit(unit, &scope, strict, &mut diagnostics);
            exports.extend(unit.text().lines().filter_map(|line| match Statement::parse(line) {
                Statement::Export(symbol) => Some(symbol.to_owned()),
                _ => None,
            }));
        }

        let reference =
            ArtifactReference::new(name, ReferenceOrigin::Module(name.to_owned()), exports);
        Ok(CompiledModule::new(reference, diagnostics))
    }
}
