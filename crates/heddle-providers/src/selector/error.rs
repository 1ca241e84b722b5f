//! Errors raised while selecting transformations.

use thiserror::Error;

fn list(titles: &[String]) -> String {
    if titles.is_empty() {
        "(none)".to_owned()
    } else {
        titles
            .iter()
            .map(|title| format!("'{title}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Failures raised by selection and title validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No candidate matched the selector.
    #[error("no transformation matches {selector}; available: {}", list(.available))]
    TransformationNotFound {
        /// Description of the selector.
        selector: String,
        /// Titles of all candidates.
        available: Vec<String>,
    },

    /// The offered titles differ from the expected set.
    #[error(
        "transformation titles differ; unexpected: {}; missing: {}",
        list(.unexpected),
        list(.missing)
    )]
    TitleMismatch {
        /// Offered but not expected.
        unexpected: Vec<String>,
        /// Expected but not offered.
        missing: Vec<String>,
    },

    /// Title validation was asked to compare against nothing.
    #[error("expected title list is empty")]
    EmptyExpectedTitles,

    /// The provider offered transformations where none were expected.
    #[error("expected no transformations but got: {}", list(.titles))]
    UnexpectedTransformations {
        /// Offered titles.
        titles: Vec<String>,
    },
}
