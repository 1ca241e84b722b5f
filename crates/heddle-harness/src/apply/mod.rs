//! Applies a selected transformation to a workspace.
//!
//! Operations are staged on a copy of the workspace and the copy replaces
//! the original only once every operation has succeeded, so a failed apply
//! leaves the workspace exactly as it was.

mod error;

use tracing::debug;

use heddle_providers::{EditOperation, ProposedTransformation, TextEdit};
use heddle_workspace::{SourceUnit, UnitKey, Workspace};

pub use error::ApplyError;

const APPLY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::apply");

/// Summary of a successfully applied transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChanges {
    title: String,
    touched: Vec<UnitKey>,
    version: u64,
}

impl AppliedChanges {
    /// Title of the applied transformation.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Units addressed by the operations, in operation order.
    #[must_use]
    pub fn touched(&self) -> &[UnitKey] {
        &self.touched
    }

    /// Workspace version after the change set.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

/// Realises `transformation` against `workspace` and applies its operations
/// atomically.
///
/// # Errors
///
/// Returns [`ApplyError::RealizationFaulted`] when the provider cannot produce
/// its operations, [`ApplyError::NoEditsProduced`] for an empty change set,
/// and [`ApplyError::InvalidEdit`], [`ApplyError::EditOutOfRange`] or
/// [`ApplyError::OverlappingEdits`] when any operation does not fit the
/// workspace. The workspace is untouched on error.
pub fn apply_transformation(
    workspace: &mut Workspace,
    transformation: &ProposedTransformation,
) -> Result<AppliedChanges, ApplyError> {
    let title = transformation.title();
    let operations =
        transformation
            .operations(workspace)
            .map_err(|fault| ApplyError::RealizationFaulted {
                title: title.to_owned(),
                message: fault.message().to_owned(),
            })?;
    if operations.is_empty() {
        return Err(ApplyError::NoEditsProduced {
            title: title.to_owned(),
        });
    }

    let mut staged = workspace.clone();
    let mut touched = Vec::with_capacity(operations.len());
    for operation in &operations {
        apply_operation(&mut staged, operation)?;
        debug!(
            target: APPLY_TARGET,
            kind = operation.kind(),
            unit = %operation.unit(),
            "applied operation"
        );
        touched.push(operation.unit().clone());
    }
    staged.advance_version();
    *workspace = staged;

    debug!(
        target: APPLY_TARGET,
        title,
        operations = operations.len(),
        version = workspace.version(),
        "applied transformation"
    );
    Ok(AppliedChanges {
        title: title.to_owned(),
        touched,
        version: workspace.version(),
    })
}

fn apply_operation(workspace: &mut Workspace, operation: &EditOperation) -> Result<(), ApplyError> {
    match operation {
        EditOperation::EditText { unit, edits } => {
            let current = existing_text(workspace, unit)?;
            let edited = apply_text_edits(unit, current, edits)?;
            replace(workspace, unit, edited)
        }
        EditOperation::ReplaceText { unit, text } => replace(workspace, unit, text.clone()),
        EditOperation::CreateUnit { unit, text } => {
            if workspace.insert_unit(SourceUnit::new(unit.clone(), text.clone())) {
                Ok(())
            } else if workspace.module(unit.module()).is_none() {
                Err(ApplyError::invalid_edit(
                    unit.to_string(),
                    format!("module '{}' does not exist", unit.module()),
                ))
            } else {
                Err(ApplyError::invalid_edit(unit.to_string(), "unit already exists"))
            }
        }
        EditOperation::DeleteUnit { unit } => workspace
            .remove_unit(unit)
            .map(|_| ())
            .ok_or_else(|| ApplyError::invalid_edit(unit.to_string(), "unit does not exist")),
    }
}

fn existing_text<'w>(workspace: &'w Workspace, unit: &UnitKey) -> Result<&'w str, ApplyError> {
    workspace
        .unit(unit)
        .map(SourceUnit::text)
        .ok_or_else(|| ApplyError::invalid_edit(unit.to_string(), "unit does not exist"))
}

fn replace(workspace: &mut Workspace, unit: &UnitKey, text: String) -> Result<(), ApplyError> {
    if workspace.replace_text(unit, text) {
        Ok(())
    } else {
        Err(ApplyError::invalid_edit(unit.to_string(), "unit does not exist"))
    }
}

/// Applies byte-span edits to `original`, the current text of `unit`.
///
/// Edits address the original text. They are ordered by position, checked
/// for bounds and overlap, and applied from the end of the text towards the
/// start so earlier offsets stay valid. Two insertions at the same offset are
/// applied in the order given.
///
/// # Errors
///
/// Returns [`ApplyError::EditOutOfRange`] for the first edit that falls
/// outside the text or splits a character, and
/// [`ApplyError::OverlappingEdits`] for one that starts before its
/// predecessor ends.
pub fn apply_text_edits(
    unit: &UnitKey,
    original: &str,
    edits: &[TextEdit],
) -> Result<String, ApplyError> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.span().start(), edit.span().end()));

    let mut previous_end = 0;
    for edit in &ordered {
        let span = edit.span();
        if !span.fits(original) {
            return Err(ApplyError::EditOutOfRange {
                unit: unit.to_string(),
                span,
                length: original.len(),
            });
        }
        if span.start() < previous_end {
            return Err(ApplyError::OverlappingEdits {
                unit: unit.to_string(),
                span,
            });
        }
        previous_end = span.end();
    }

    let mut result = original.to_owned();
    for edit in ordered.iter().rev() {
        let span = edit.span();
        result.replace_range(span.start()..span.end(), edit.new_text());
    }
    Ok(result)
}

#[cfg(test)]
mod tests;
