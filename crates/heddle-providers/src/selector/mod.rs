//! Picks one transformation out of a provider's candidates, and checks the
//! candidate titles against an expected set.

mod error;

use std::collections::BTreeSet;
use std::fmt;

use crate::transformation::ProposedTransformation;

pub use error::SelectionError;

/// Chooses a transformation by position or by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformationSelector {
    /// Zero-based position in the provider's output.
    ByIndex(usize),
    /// Exact title; the first match wins when titles repeat.
    ByTitle(String),
}

impl Default for TransformationSelector {
    fn default() -> Self {
        Self::ByIndex(0)
    }
}

impl fmt::Display for TransformationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByIndex(index) => write!(f, "index {index}"),
            Self::ByTitle(title) => write!(f, "title '{title}'"),
        }
    }
}

impl TransformationSelector {
    /// Selects by title.
    #[must_use]
    pub fn by_title(title: impl Into<String>) -> Self {
        Self::ByTitle(title.into())
    }

    /// Picks the matching candidate.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::TransformationNotFound`], listing every
    /// available title, when nothing matches.
    pub fn select<'t>(
        &self,
        candidates: &'t [ProposedTransformation],
    ) -> Result<&'t ProposedTransformation, SelectionError> {
        let selected = match self {
            Self::ByIndex(index) => candidates.get(*index),
            Self::ByTitle(title) => candidates
                .iter()
                .find(|candidate| candidate.title() == title),
        };
        selected.ok_or_else(|| SelectionError::TransformationNotFound {
            selector: self.to_string(),
            available: titles(candidates),
        })
    }
}

fn titles(candidates: &[ProposedTransformation]) -> Vec<String> {
    candidates
        .iter()
        .map(|candidate| candidate.title().to_owned())
        .collect()
}

/// Checks that the candidate titles equal `expected`, ignoring order.
///
/// # Errors
///
/// Returns [`SelectionError::EmptyExpectedTitles`] for an empty expectation
/// and [`SelectionError::TitleMismatch`] naming the unexpected and missing
/// titles otherwise.
pub fn verify_titles<S: AsRef<str>>(
    candidates: &[ProposedTransformation],
    expected: &[S],
) -> Result<(), SelectionError> {
    if expected.is_empty() {
        return Err(SelectionError::EmptyExpectedTitles);
    }
    let actual: BTreeSet<&str> = candidates.iter().map(ProposedTransformation::title).collect();
    let wanted: BTreeSet<&str> = expected.iter().map(AsRef::as_ref).collect();

    let unexpected: Vec<String> = actual.difference(&wanted).map(|t| (*t).to_owned()).collect();
    let missing: Vec<String> = wanted.difference(&actual).map(|t| (*t).to_owned()).collect();
    if unexpected.is_empty() && missing.is_empty() {
        Ok(())
    } else {
        Err(SelectionError::TitleMismatch {
            unexpected,
            missing,
        })
    }
}

/// Checks that the provider offered nothing.
///
/// # Errors
///
/// Returns [`SelectionError::UnexpectedTransformations`] listing the offered
/// titles.
pub fn verify_none(candidates: &[ProposedTransformation]) -> Result<(), SelectionError> {
    if candidates.is_empty() {
        Ok(())
    } else {
        Err(SelectionError::UnexpectedTransformations {
            titles: titles(candidates),
        })
    }
}
