//! The compiler port: the external semantic engine behind the workspace.
//!
//! The harness never parses or analyses source text itself. A [`Compiler`]
//! turns one module's units plus its imported references into a
//! [`CompiledModule`]: an artefact reference that dependents import and the
//! diagnostics reported for the module.

use std::fmt;

use thiserror::Error;

use crate::module::ModuleDescriptor;
use crate::reference::ArtifactReference;
use crate::span::TextSpan;
use crate::workspace::{SourceUnit, UnitKey};

/// Severity of a compile diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Not shown to users.
    Hidden,
    /// Informational.
    Info,
    /// Suspicious but compilable.
    Warning,
    /// The module does not compile.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Hidden => "hidden",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A diagnostic reported while compiling a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    id: String,
    severity: Severity,
    message: String,
    unit: Option<UnitKey>,
    span: Option<TextSpan>,
}

impl CompileDiagnostic {
    /// Creates a diagnostic with no location.
    #[must_use]
    pub fn new(id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            unit: None,
            span: None,
        }
    }

    /// Attaches a location.
    #[must_use]
    pub fn at(mut self, unit: UnitKey, span: TextSpan) -> Self {
        self.unit = Some(unit);
        self.span = Some(span);
        self
    }

    /// Diagnostic identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Unit the diagnostic refers to, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<&UnitKey> {
        self.unit.as_ref()
    }

    /// Span the diagnostic refers to, if any.
    #[must_use]
    pub const fn span(&self) -> Option<TextSpan> {
        self.span
    }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.id, self.message)?;
        if let (Some(unit), Some(span)) = (&self.unit, self.span) {
            write!(f, " at {unit}{span}")?;
        }
        Ok(())
    }
}

/// Everything a compiler needs to compile one module.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Module being compiled.
    pub descriptor: &'a ModuleDescriptor,
    /// The module's units in key order.
    pub units: &'a [SourceUnit],
    /// References visible to the module.
    pub references: &'a [ArtifactReference],
}

/// The outcome of compiling a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    reference: ArtifactReference,
    diagnostics: Vec<CompileDiagnostic>,
}

impl CompiledModule {
    /// Creates a compile result.
    #[must_use]
    pub const fn new(reference: ArtifactReference, diagnostics: Vec<CompileDiagnostic>) -> Self {
        Self {
            reference,
            diagnostics,
        }
    }

    /// Artefact reference dependents import.
    #[must_use]
    pub const fn reference(&self) -> &ArtifactReference {
        &self.reference
    }

    /// Diagnostics reported for the module.
    #[must_use]
    pub fn diagnostics(&self) -> &[CompileDiagnostic] {
        &self.diagnostics
    }
}

/// The compiler itself failed, independent of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compiler failed on module '{module}': {message}")]
pub struct CompilerError {
    /// Module being compiled.
    pub module: String,
    /// Failure description.
    pub message: String,
}

impl CompilerError {
    /// Creates a new compiler error.
    #[must_use]
    pub fn new(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            message: message.into(),
        }
    }
}

/// A language compiler or semantic engine.
pub trait Compiler {
    /// Key identifying the platform whose foundation references this
    /// compiler uses. Compilers sharing a key share cached references.
    fn platform(&self) -> &str;

    /// Returns true when the compiler handles `language`.
    fn supports_language(&self, language: &str) -> bool {
        let _ = language;
        true
    }

    /// Computes the platform's foundation references. Called at most once per
    /// platform key per process.
    fn foundation_references(&self) -> Vec<ArtifactReference>;

    /// Compiles one module.
    ///
    /// # Errors
    ///
    /// Returns a [`CompilerError`] when the compiler cannot run at all.
    /// Problems in the source text are reported as diagnostics instead.
    fn compile(&self, request: CompileRequest<'_>) -> Result<CompiledModule, CompilerError>;
}
