//! Transformations offered by providers.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use heddle_workspace::Workspace;

use crate::edit::EditOperation;

/// A provider failed while computing or realising a transformation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderFault {
    message: String,
}

impl ProviderFault {
    /// Creates a fault with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Fault description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A candidate change offered by a provider.
///
/// Realising the change set is deferred until the transformation is applied,
/// so computing many candidates stays cheap.
pub trait Transformation: fmt::Debug {
    /// Human-readable title used for selection.
    fn title(&self) -> &str;

    /// Key grouping equivalent transformations across locations.
    fn equivalence_key(&self) -> Option<&str> {
        None
    }

    /// Realises the change set against `workspace`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderFault`] when the provider cannot produce its
    /// operations.
    fn operations(&self, workspace: &Workspace) -> Result<Vec<EditOperation>, ProviderFault>;
}

/// A transformation as collected from a provider, ready for selection.
#[derive(Debug, Clone)]
pub struct ProposedTransformation {
    provider: String,
    inner: Arc<dyn Transformation>,
}

impl ProposedTransformation {
    /// Wraps a transformation offered by `provider`.
    #[must_use]
    pub fn new(provider: impl Into<String>, transformation: Arc<dyn Transformation>) -> Self {
        Self {
            provider: provider.into(),
            inner: transformation,
        }
    }

    /// Name of the offering provider.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Title of the transformation.
    #[must_use]
    pub fn title(&self) -> &str {
        self.inner.title()
    }

    /// Equivalence key, if the provider sets one.
    #[must_use]
    pub fn equivalence_key(&self) -> Option<&str> {
        self.inner.equivalence_key()
    }

    /// Realises the change set.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`ProviderFault`].
    pub fn operations(&self, workspace: &Workspace) -> Result<Vec<EditOperation>, ProviderFault> {
        self.inner.operations(workspace)
    }
}

/// A transformation whose operations are fixed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTransformation {
    title: String,
    equivalence_key: Option<String>,
    operations: Vec<EditOperation>,
}

impl StaticTransformation {
    /// Creates a transformation with a fixed change set.
    #[must_use]
    pub fn new(title: impl Into<String>, operations: Vec<EditOperation>) -> Self {
        Self {
            title: title.into(),
            equivalence_key: None,
            operations,
        }
    }

    /// Sets the equivalence key.
    #[must_use]
    pub fn with_equivalence_key(mut self, key: impl Into<String>) -> Self {
        self.equivalence_key = Some(key.into());
        self
    }
}

impl Transformation for StaticTransformation {
    fn title(&self) -> &str {
        &self.title
    }

    fn equivalence_key(&self) -> Option<&str> {
        self.equivalence_key.as_deref()
    }

    fn operations(&self, _workspace: &Workspace) -> Result<Vec<EditOperation>, ProviderFault> {
        Ok(self.operations.clone())
    }
}
