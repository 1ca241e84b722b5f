//! Invokes providers against a built workspace.
//!
//! The adapter is the only place that talks to providers. It guards the call
//! with the input-error check, hands the provider a context and a sink, and
//! turns a provider's own failure into [`InvocationError::ProviderFaulted`] so
//! it cannot be mistaken for an empty result.

mod error;

use tracing::debug;

use heddle_workspace::{TargetUnit, Workspace};

use crate::finding::Finding;
use crate::provider::{
    AnalysisContext, AnalysisProvider, CancellationToken, FindingSink, RefactoringContext,
    TransformationProvider, TransformationSink,
};
use crate::transformation::ProposedTransformation;

pub use error::InvocationError;

const INVOKE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::invoke");

/// Options controlling provider invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationOptions {
    /// Refuse to invoke a provider on a module that already has compile
    /// errors.
    pub fail_on_input_errors: bool,
}

impl Default for InvocationOptions {
    fn default() -> Self {
        Self {
            fail_on_input_errors: true,
        }
    }
}

impl InvocationOptions {
    /// Sets whether input errors fail the invocation.
    #[must_use]
    pub const fn with_fail_on_input_errors(mut self, enabled: bool) -> Self {
        self.fail_on_input_errors = enabled;
        self
    }
}

fn check_input(
    workspace: &Workspace,
    module: &str,
    options: InvocationOptions,
) -> Result<(), InvocationError> {
    let Some(checked) = workspace.module(module) else {
        return Err(InvocationError::unknown_module(module));
    };
    if !options.fail_on_input_errors {
        return Ok(());
    }
    let errors: Vec<_> = checked.errors().cloned().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(InvocationError::InputContainsErrors {
            module: checked.name().to_owned(),
            diagnostics: errors,
        })
    }
}

/// Runs a transformation provider at the target location and returns every
/// transformation it offers, in registration order.
///
/// # Errors
///
/// Returns [`InvocationError::InputContainsErrors`] before the provider runs
/// when the target module has compile errors and the check is enabled,
/// [`InvocationError::ProviderFaulted`] when the provider fails, and
/// [`InvocationError::UnknownModule`] or [`InvocationError::UnitNotFound`]
/// when the target does not exist in the workspace.
pub fn collect_transformations(
    workspace: &Workspace,
    target: &TargetUnit,
    provider: &dyn TransformationProvider,
    options: InvocationOptions,
) -> Result<Vec<ProposedTransformation>, InvocationError> {
    let key = target.key();
    check_input(workspace, key.module(), options)?;
    let unit = workspace
        .unit(key)
        .ok_or_else(|| InvocationError::unit_not_found(key.to_string()))?;

    let cancellation = CancellationToken::new();
    let mut sink = TransformationSink::default();
    let mut context =
        RefactoringContext::new(workspace, unit, target.span(), &cancellation, &mut sink);
    provider
        .compute(&mut context)
        .map_err(|fault| InvocationError::provider_faulted(provider.name(), fault.message()))?;

    let transformations: Vec<ProposedTransformation> = sink
        .into_inner()
        .into_iter()
        .map(|transformation| ProposedTransformation::new(provider.name(), transformation))
        .collect();
    debug!(
        target: INVOKE_TARGET,
        provider = provider.name(),
        unit = %key,
        span = %target.span(),
        count = transformations.len(),
        "collected transformations"
    );
    Ok(transformations)
}

/// Runs an analysis provider over `module` and returns every finding it
/// reports, in report order.
///
/// # Errors
///
/// Returns [`InvocationError::InputContainsErrors`] before the provider runs
/// when the module has compile errors and the check is enabled,
/// [`InvocationError::ProviderFaulted`] when the provider fails, and
/// [`InvocationError::UnknownModule`] when the module does not exist.
pub fn collect_findings(
    workspace: &Workspace,
    module: &str,
    provider: &dyn AnalysisProvider,
    options: InvocationOptions,
) -> Result<Vec<Finding>, InvocationError> {
    check_input(workspace, module, options)?;
    let Some(analysed) = workspace.module(module) else {
        return Err(InvocationError::unknown_module(module));
    };

    let cancellation = CancellationToken::new();
    let mut sink = FindingSink::default();
    let mut context = AnalysisContext::new(workspace, analysed, &cancellation, &mut sink);
    provider
        .analyze(&mut context)
        .map_err(|fault| InvocationError::provider_faulted(provider.name(), fault.message()))?;

    let findings = sink.into_inner();
    debug!(
        target: INVOKE_TARGET,
        provider = provider.name(),
        module,
        count = findings.len(),
        "collected findings"
    );
    Ok(findings)
}
