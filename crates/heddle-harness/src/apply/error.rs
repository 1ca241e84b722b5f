//! Errors raised while applying a selected transformation.

use thiserror::Error;

use heddle_workspace::TextSpan;

/// Failures raised by the applier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The transformation realised an empty change set.
    #[error("transformation '{title}' produced no edit operations")]
    NoEditsProduced {
        /// Title of the applied transformation.
        title: String,
    },

    /// An operation could not be applied to the workspace.
    #[error("invalid edit for unit '{unit}': {reason}")]
    InvalidEdit {
        /// Unit the operation addressed.
        unit: String,
        /// Why the operation was rejected.
        reason: String,
    },

    /// A text edit falls outside its unit or splits a character.
    #[error("edit {span} for unit '{unit}' does not fit its {length}-byte text")]
    EditOutOfRange {
        /// Unit the edit addressed.
        unit: String,
        /// The rejected span.
        span: TextSpan,
        /// Byte length of the unit's text.
        length: usize,
    },

    /// A text edit starts inside the span of an earlier edit.
    #[error("edit {span} for unit '{unit}' overlaps a preceding edit")]
    OverlappingEdits {
        /// Unit the edits addressed.
        unit: String,
        /// The later of the two overlapping spans.
        span: TextSpan,
    },

    /// The provider failed while realising its operations.
    #[error("transformation '{title}' failed to produce its operations: {message}")]
    RealizationFaulted {
        /// Title of the applied transformation.
        title: String,
        /// Fault description reported by the provider.
        message: String,
    },
}

impl ApplyError {
    /// Creates a new `InvalidEdit` error.
    #[must_use]
    pub fn invalid_edit(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEdit {
            unit: unit.into(),
            reason: reason.into(),
        }
    }
}
