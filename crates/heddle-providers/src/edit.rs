//! Edit operations produced by transformations.

use heddle_workspace::{TextSpan, UnitKey};

/// Replaces the bytes covered by `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    span: TextSpan,
    new_text: String,
}

impl TextEdit {
    /// Creates a replacement edit.
    #[must_use]
    pub fn replace(span: TextSpan, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// Creates an insertion at `offset`.
    #[must_use]
    pub fn insert_at(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(TextSpan::empty(offset), text)
    }

    /// Creates a deletion of `span`.
    #[must_use]
    pub fn delete(span: TextSpan) -> Self {
        Self::replace(span, String::new())
    }

    /// Span being replaced.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        self.span
    }

    /// Replacement text.
    #[must_use]
    pub fn new_text(&self) -> &str {
        &self.new_text
    }
}

/// One step of a transformation's change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Applies span edits to an existing unit.
    EditText {
        /// Unit being edited.
        unit: UnitKey,
        /// Edits against the unit's current text.
        edits: Vec<TextEdit>,
    },
    /// Replaces an existing unit's text wholesale.
    ReplaceText {
        /// Unit being replaced.
        unit: UnitKey,
        /// New text.
        text: String,
    },
    /// Adds a unit that must not already exist.
    CreateUnit {
        /// Key of the new unit.
        unit: UnitKey,
        /// Initial text.
        text: String,
    },
    /// Removes an existing unit.
    DeleteUnit {
        /// Unit being removed.
        unit: UnitKey,
    },
}

impl EditOperation {
    /// Unit the operation addresses.
    #[must_use]
    pub const fn unit(&self) -> &UnitKey {
        match self {
            Self::EditText { unit, .. }
            | Self::ReplaceText { unit, .. }
            | Self::CreateUnit { unit, .. }
            | Self::DeleteUnit { unit } => unit,
        }
    }

    /// Short verb used in logs and error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EditText { .. } => "edit",
            Self::ReplaceText { .. } => "replace",
            Self::CreateUnit { .. } => "create",
            Self::DeleteUnit { .. } => "delete",
        }
    }
}
