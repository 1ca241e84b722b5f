//! Error types for workspace construction and location resolution.

use thiserror::Error;

use crate::compiler::CompilerError;
use crate::span::TextSpan;

/// Failures raised while resolving a locator against unit text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The locator does not address any text in the unit.
    #[error("location {locator} not found in unit '{unit}'")]
    LocationNotFound {
        /// Unit the locator was resolved against.
        unit: String,
        /// Human description of the locator.
        locator: String,
    },

    /// The markup addresses more than one location.
    #[error("location {locator} is ambiguous in unit '{unit}': {reason}")]
    AmbiguousLocation {
        /// Unit the locator was resolved against.
        unit: String,
        /// Human description of the locator.
        locator: String,
        /// Why the location could not be pinned down.
        reason: String,
    },

    /// An explicit span starts after it ends.
    #[error("span [{start}..{end}) in unit '{unit}' starts after it ends")]
    InvertedSpan {
        /// Unit the span was declared for.
        unit: String,
        /// Requested start offset.
        start: usize,
        /// Requested end offset.
        end: usize,
    },
}

impl LocateError {
    /// Creates a new `LocationNotFound` error.
    #[must_use]
    pub fn not_found(unit: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::LocationNotFound {
            unit: unit.into(),
            locator: locator.into(),
        }
    }

    /// Creates a new `AmbiguousLocation` error.
    #[must_use]
    pub fn ambiguous(
        unit: impl Into<String>,
        locator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AmbiguousLocation {
            unit: unit.into(),
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `InvertedSpan` error.
    #[must_use]
    pub fn inverted(unit: impl Into<String>, span: TextSpan) -> Self {
        Self::InvertedSpan {
            unit: unit.into(),
            start: span.start(),
            end: span.end(),
        }
    }

    /// Returns a copy of this error attributed to `unit`.
    #[must_use]
    pub fn in_unit(self, name: impl Into<String>) -> Self {
        let unit = name.into();
        match self {
            Self::LocationNotFound { locator, .. } => Self::LocationNotFound { unit, locator },
            Self::AmbiguousLocation {
                locator, reason, ..
            } => Self::AmbiguousLocation {
                unit,
                locator,
                reason,
            },
            Self::InvertedSpan { start, end, .. } => Self::InvertedSpan { unit, start, end },
        }
    }
}

/// Failures raised while declaring changes or building a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// A unit path did not name both a module and a unit.
    #[error("invalid unit path '{path}': expected Module/[Folder/...]/Unit")]
    InvalidUnitPath {
        /// The rejected path.
        path: String,
    },

    /// A change names a module with no descriptor.
    #[error("unit '{unit}' names unknown module '{module}'")]
    UnknownModule {
        /// Module name carried by the change.
        module: String,
        /// Unit declared by the change.
        unit: String,
    },

    /// Two descriptors share a name.
    #[error("module '{module}' is declared more than once")]
    DuplicateModuleName {
        /// The duplicated module name.
        module: String,
    },

    /// Two changes address the same unit.
    #[error("unit '{unit}' is declared more than once")]
    DuplicateUnitPath {
        /// Display form of the duplicated unit key.
        unit: String,
    },

    /// The compiler cannot handle the module's language.
    #[error("module '{module}' uses language '{language}' which the compiler does not support")]
    UnsupportedLanguage {
        /// Module requesting the language.
        module: String,
        /// Requested language.
        language: String,
    },

    /// A `depends_on` entry names no known module.
    #[error("module '{module}' depends on unknown module '{reference}'")]
    UnknownModuleReference {
        /// Module carrying the reference.
        module: String,
        /// The unresolved dependency name.
        reference: String,
    },

    /// The module graph contains a cycle.
    #[error("cyclic module dependency: {}", .cycle.join(" -> "))]
    CyclicModuleDependency {
        /// Module names along the cycle, starting and ending with the same
        /// module.
        cycle: Vec<String>,
    },

    /// The compile order names a module the workspace does not hold.
    #[error("module '{module}' was ordered for compilation but is not in the workspace")]
    ModuleNotInWorkspace {
        /// The ordered module name.
        module: String,
    },

    /// No change carries a locator.
    #[error("no source unit carries a location marker")]
    NoTargetUnit,

    /// More than one change carries a locator.
    #[error("more than one source unit carries a location marker: {}", .units.join(", "))]
    MultipleTargetUnits {
        /// Units that carry locators.
        units: Vec<String>,
    },

    /// The target unit's locator did not resolve.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// The compiler failed outright.
    #[error(transparent)]
    Compiler(#[from] CompilerError),
}

impl WorkspaceError {
    /// Creates a new `InvalidUnitPath` error.
    #[must_use]
    pub fn invalid_unit_path(path: impl Into<String>) -> Self {
        Self::InvalidUnitPath { path: path.into() }
    }

    /// Creates a new `UnknownModule` error.
    #[must_use]
    pub fn unknown_module(module: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::UnknownModule {
            module: module.into(),
            unit: unit.into(),
        }
    }

    /// Creates a new `DuplicateModuleName` error.
    #[must_use]
    pub fn duplicate_module(module: impl Into<String>) -> Self {
        Self::DuplicateModuleName {
            module: module.into(),
        }
    }

    /// Creates a new `DuplicateUnitPath` error.
    #[must_use]
    pub fn duplicate_unit(unit: impl Into<String>) -> Self {
        Self::DuplicateUnitPath { unit: unit.into() }
    }

    /// Creates a new `UnsupportedLanguage` error.
    #[must_use]
    pub fn unsupported_language(module: impl Into<String>, language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            module: module.into(),
            language: language.into(),
        }
    }

    /// Creates a new `UnknownModuleReference` error.
    #[must_use]
    pub fn unknown_reference(module: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnknownModuleReference {
            module: module.into(),
            reference: reference.into(),
        }
    }

    /// Creates a new `CyclicModuleDependency` error.
    #[must_use]
    pub const fn cyclic(cycle: Vec<String>) -> Self {
        Self::CyclicModuleDependency { cycle }
    }

    /// Returns true for errors caused by how the scenario was declared rather
    /// than by the text of its units.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        !matches!(self, Self::Locate(_) | Self::Compiler(_))
    }
}
