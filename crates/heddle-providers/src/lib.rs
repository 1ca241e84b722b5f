//! Provider ports, invocation and selection for the heddle harness.
//!
//! Providers are the tools under test: a [`TransformationProvider`] offers
//! [`Transformation`]s at a located span and an [`AnalysisProvider`] reports
//! [`Finding`]s over a module. This crate defines those ports, the adapter
//! that invokes them against a compiled workspace
//! ([`collect_transformations`], [`collect_findings`]), and the
//! [`TransformationSelector`] that picks one candidate for application.

mod edit;
mod finding;
mod invoke;
mod provider;
mod selector;
mod transformation;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use edit::{EditOperation, TextEdit};
pub use finding::Finding;
pub use invoke::{InvocationError, InvocationOptions, collect_findings, collect_transformations};
pub use provider::{
    AnalysisContext, AnalysisProvider, CancellationToken, FindingSink, RefactoringContext,
    TransformationProvider, TransformationSink,
};
pub use selector::{SelectionError, TransformationSelector, verify_none, verify_titles};
pub use transformation::{
    ProposedTransformation, ProviderFault, StaticTransformation, Transformation,
};

#[cfg(test)]
mod tests;
