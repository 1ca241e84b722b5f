//! Provider ports and the contexts they are invoked with.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use heddle_workspace::{Module, SourceUnit, TextSpan, Workspace};

use crate::finding::Finding;
use crate::transformation::{ProviderFault, Transformation};

/// Cooperative cancellation flag shared with providers.
///
/// The harness threads a token through every context but never cancels it;
/// providers may still poll it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Collects transformations registered by a provider.
#[derive(Debug, Default)]
pub struct TransformationSink {
    registered: Vec<Arc<dyn Transformation>>,
}

impl TransformationSink {
    /// Records a transformation.
    pub fn register(&mut self, transformation: Arc<dyn Transformation>) {
        self.registered.push(transformation);
    }

    /// Returns everything registered, in registration order.
    #[must_use]
    pub fn into_inner(self) -> Vec<Arc<dyn Transformation>> {
        self.registered
    }
}

/// Collects findings reported by a provider.
#[derive(Debug, Default)]
pub struct FindingSink {
    reported: Vec<Finding>,
}

impl FindingSink {
    /// Records a finding.
    pub fn report(&mut self, finding: Finding) {
        self.reported.push(finding);
    }

    /// Returns everything reported, in report order.
    #[must_use]
    pub fn into_inner(self) -> Vec<Finding> {
        self.reported
    }
}

/// What a transformation provider sees when invoked at a location.
pub struct RefactoringContext<'a> {
    workspace: &'a Workspace,
    unit: &'a SourceUnit,
    span: TextSpan,
    cancellation: &'a CancellationToken,
    sink: &'a mut TransformationSink,
}

impl<'a> RefactoringContext<'a> {
    /// Creates a context over the target unit and span.
    #[must_use]
    pub const fn new(
        workspace: &'a Workspace,
        unit: &'a SourceUnit,
        span: TextSpan,
        cancellation: &'a CancellationToken,
        sink: &'a mut TransformationSink,
    ) -> Self {
        Self {
            workspace,
            unit,
            span,
            cancellation,
            sink,
        }
    }

    /// The compiled workspace.
    #[must_use]
    pub const fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    /// The target unit.
    #[must_use]
    pub const fn unit(&self) -> &'a SourceUnit {
        self.unit
    }

    /// The located span within the target unit.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        self.span
    }

    /// The cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &'a CancellationToken {
        self.cancellation
    }

    /// Offers a transformation.
    pub fn register(&mut self, transformation: impl Transformation + 'static) {
        self.sink.register(Arc::new(transformation));
    }
}

/// What an analysis provider sees when invoked on a module.
pub struct AnalysisContext<'a> {
    workspace: &'a Workspace,
    module: &'a Module,
    cancellation: &'a CancellationToken,
    sink: &'a mut FindingSink,
}

impl<'a> AnalysisContext<'a> {
    /// Creates a context over one module.
    #[must_use]
    pub const fn new(
        workspace: &'a Workspace,
        module: &'a Module,
        cancellation: &'a CancellationToken,
        sink: &'a mut FindingSink,
    ) -> Self {
        Self {
            workspace,
            module,
            cancellation,
            sink,
        }
    }

    /// The compiled workspace.
    #[must_use]
    pub const fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    /// The module under analysis.
    #[must_use]
    pub const fn module(&self) -> &'a Module {
        self.module
    }

    /// The cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &'a CancellationToken {
        self.cancellation
    }

    /// Reports a finding.
    pub fn report(&mut self, finding: Finding) {
        self.sink.report(finding);
    }
}

/// Offers transformations at a location.
pub trait TransformationProvider {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Registers every transformation applicable at the context's location.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderFault`] when the provider itself fails.
    fn compute(&self, context: &mut RefactoringContext<'_>) -> Result<(), ProviderFault>;
}

/// Reports findings over a module.
pub trait AnalysisProvider {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Reports every finding in the context's module.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderFault`] when the provider itself fails.
    fn analyze(&self, context: &mut AnalysisContext<'_>) -> Result<(), ProviderFault>;
}
