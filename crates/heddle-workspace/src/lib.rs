//! In-memory project graphs for transformation scenarios.
//!
//! A scenario declares its modules with [`ModuleDescriptor`] and its source
//! units with [`SourceUnitChange`]. The [`WorkspaceBuilder`] turns those
//! declarations into a compiled [`Workspace`], ordering modules so that each
//! compiles after its dependencies and imports their artefacts, and resolves
//! the scenario's [`Locator`] to a [`TargetUnit`].
//!
//! The crate performs no parsing or semantic analysis of its own; that is the
//! job of the [`Compiler`] port.
//!
//! ```ignore
//! use heddle_workspace::{ModuleDescriptor, SourceUnitChange, WorkspaceBuilder};
//!
//! let modules = [
//!     ModuleDescriptor::new("Core"),
//!     ModuleDescriptor::new("App").depends_on("Core"),
//! ];
//! let changes = [
//!     SourceUnitChange::unchanged("export Widget", "Core/Widget")?,
//!     SourceUnitChange::target_unchanged("[|use Widget|]", "App/Main")?,
//! ];
//! let (workspace, target) = WorkspaceBuilder::new(&compiler)
//!     .build_with_target(&modules, &changes)?;
//! assert_eq!(workspace.compile_order(), ["Core", "App"]);
//! ```

mod builder;
mod change;
mod compiler;
mod error;
mod locator;
mod module;
mod reference;
mod span;
mod target;
mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use builder::WorkspaceBuilder;
pub use change::{DEFAULT_UNIT_PATH, SourceUnitChange, UnitPath, UnitState};
pub use compiler::{
    CompileDiagnostic, CompileRequest, CompiledModule, Compiler, CompilerError, Severity,
};
pub use error::{LocateError, WorkspaceError};
pub use locator::{
    LineLocator, Locator, MARKER_END, MARKER_START, MarkerLocator, ResolvedLocation, SpanLocator,
    strip_markers,
};
pub use module::{LanguageOptions, ModuleDescriptor};
pub use reference::{ArtifactReference, ReferenceOrigin, foundation_references};
pub use span::{TextSpan, line_of_offset, line_span, line_spans};
pub use target::{TargetUnit, resolve_target};
pub use workspace::{Module, SourceUnit, UnitKey, Workspace};

#[cfg(test)]
mod tests;
