//! Errors raised while verifying the post-apply workspace.

use thiserror::Error;

/// Failures raised by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// A unit expected to be deleted still exists.
    #[error("unit '{unit}' should have been deleted but still contains:\n{residual_text}")]
    UnitNotDeleted {
        /// The surviving unit.
        unit: String,
        /// Its text after the transformation.
        residual_text: String,
    },

    /// A unit expected to exist after the transformation does not.
    #[error("unit '{unit}' does not exist after the transformation")]
    UnitMissing {
        /// The absent unit.
        unit: String,
    },

    /// A unit's text differs from its expected final state.
    #[error("unit '{unit}' differs from the expected result:\n{diff}")]
    TransformationResultMismatch {
        /// The mismatching unit.
        unit: String,
        /// Expected text after normalisation.
        expected: String,
        /// Actual text after normalisation.
        actual: String,
        /// Rendered difference.
        diff: String,
    },
}
