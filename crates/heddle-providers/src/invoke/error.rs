//! Errors raised while invoking providers.

use thiserror::Error;

use heddle_workspace::CompileDiagnostic;

fn render(diagnostics: &[CompileDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| format!("  {diagnostic}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failures raised by the invocation adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The module did not compile cleanly before the provider ran.
    #[error("module '{module}' contains compile errors before invocation:\n{}", render(.diagnostics))]
    InputContainsErrors {
        /// Module whose input is broken.
        module: String,
        /// The error diagnostics.
        diagnostics: Vec<CompileDiagnostic>,
    },

    /// The provider itself failed.
    #[error("provider '{provider}' faulted: {message}")]
    ProviderFaulted {
        /// Provider name.
        provider: String,
        /// Fault description.
        message: String,
    },

    /// The named module does not exist in the workspace.
    #[error("module '{module}' is not part of the workspace")]
    UnknownModule {
        /// Requested module.
        module: String,
    },

    /// The target unit does not exist in the workspace.
    #[error("unit '{unit}' is not part of the workspace")]
    UnitNotFound {
        /// Requested unit.
        unit: String,
    },
}

impl InvocationError {
    /// Creates a new `ProviderFaulted` error.
    #[must_use]
    pub fn provider_faulted(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderFaulted {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Creates a new `UnknownModule` error.
    #[must_use]
    pub fn unknown_module(module: impl Into<String>) -> Self {
        Self::UnknownModule {
            module: module.into(),
        }
    }

    /// Creates a new `UnitNotFound` error.
    #[must_use]
    pub fn unit_not_found(unit: impl Into<String>) -> Self {
        Self::UnitNotFound { unit: unit.into() }
    }
}
