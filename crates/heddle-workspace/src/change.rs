//! Declared source-unit changes: what a unit looks like before and after a
//! transformation.

use std::fmt;

use crate::error::WorkspaceError;
use crate::locator::{LineLocator, Locator, MarkerLocator, SpanLocator, strip_markers};
use crate::span::TextSpan;
use crate::workspace::UnitKey;

/// Path used when a scenario does not name its unit.
pub const DEFAULT_UNIT_PATH: &str = "TestModule/TestUnit";

/// Expected lifecycle of a unit across a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    /// The unit exists before and after with identical text.
    Unchanged,
    /// The unit does not exist before and is created by the transformation.
    New,
    /// The unit exists before and its text changes.
    Changed,
    /// The unit exists before and is removed by the transformation.
    Deleted,
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unchanged => "unchanged",
            Self::New => "new",
            Self::Changed => "changed",
            Self::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// A parsed `Module/Folder/.../Unit` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitPath {
    module: String,
    folders: Vec<String>,
    name: String,
}

impl UnitPath {
    /// Parses a path separated by `/` or `\`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] when the path has fewer
    /// than two segments or contains an empty segment.
    pub fn parse(path: &str) -> Result<Self, WorkspaceError> {
        let segments: Vec<&str> = path.split(['/', '\\']).collect();
        if segments.len() < 2 || segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(WorkspaceError::invalid_unit_path(path));
        }
        match segments.as_slice() {
            [module, folders @ .., name] => Ok(Self {
                module: (*module).to_owned(),
                folders: folders.iter().map(|folder| (*folder).to_owned()).collect(),
                name: (*name).to_owned(),
            }),
            _ => Err(WorkspaceError::invalid_unit_path(path)),
        }
    }

    /// Module segment.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Folder segments between module and unit.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Unit name segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts the path into the key used by the workspace.
    #[must_use]
    pub fn into_key(self) -> UnitKey {
        UnitKey::new(self.module, self.folders, self.name)
    }
}

/// One source unit as declared by a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnitChange {
    key: UnitKey,
    state: UnitState,
    initial_text: Option<String>,
    final_text: Option<String>,
    locator: Option<Locator>,
}

impl SourceUnitChange {
    fn declare(
        path: &str,
        state: UnitState,
        initial_text: Option<String>,
        final_text: Option<String>,
        locator: Option<Locator>,
    ) -> Result<Self, WorkspaceError> {
        let key = UnitPath::parse(path)?.into_key();
        Ok(Self {
            key,
            state,
            initial_text,
            final_text,
            locator,
        })
    }

    fn state_for(initial: &str, expected: &str) -> UnitState {
        if initial == expected {
            UnitState::Unchanged
        } else {
            UnitState::Changed
        }
    }

    /// A unit that the transformation must leave untouched. Markers in
    /// `code` are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path.
    pub fn unchanged(code: &str, path: &str) -> Result<Self, WorkspaceError> {
        let text = strip_markers(code);
        Self::declare(
            path,
            UnitState::Unchanged,
            Some(text.clone()),
            Some(text),
            None,
        )
    }

    /// A unit the transformation must create with exactly `code`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path.
    pub fn new_unit(code: &str, path: &str) -> Result<Self, WorkspaceError> {
        Self::declare(path, UnitState::New, None, Some(code.to_owned()), None)
    }

    /// A non-target unit whose text the transformation must change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path.
    pub fn changed(markup: &str, expected: &str, path: &str) -> Result<Self, WorkspaceError> {
        Self::declare(
            path,
            UnitState::Changed,
            Some(strip_markers(markup)),
            Some(expected.to_owned()),
            None,
        )
    }

    /// A non-target unit the transformation must delete.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path.
    pub fn deleted(markup: &str, path: &str) -> Result<Self, WorkspaceError> {
        Self::declare(
            path,
            UnitState::Deleted,
            Some(strip_markers(markup)),
            None,
            None,
        )
    }

    /// The target unit, located by markers, expected to stay unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path and
    /// [`WorkspaceError::Locate`] when the markers do not parse.
    pub fn target_unchanged(markup: &str, path: &str) -> Result<Self, WorkspaceError> {
        let (locator, text) = parse_markers(markup, path)?;
        Self::declare(
            path,
            UnitState::Unchanged,
            Some(text.clone()),
            Some(text),
            Some(Locator::Marker(locator)),
        )
    }

    /// The target unit, located by markers, expected to become `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path and
    /// [`WorkspaceError::Locate`] when the markers do not parse.
    pub fn target_changed(markup: &str, expected: &str, path: &str) -> Result<Self, WorkspaceError> {
        let (locator, text) = parse_markers(markup, path)?;
        Self::declare(
            path,
            UnitState::Changed,
            Some(text),
            Some(expected.to_owned()),
            Some(Locator::Marker(locator)),
        )
    }

    /// The target unit, located by markers, expected to be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path and
    /// [`WorkspaceError::Locate`] when the markers do not parse.
    pub fn target_deleted(markup: &str, path: &str) -> Result<Self, WorkspaceError> {
        let (locator, text) = parse_markers(markup, path)?;
        Self::declare(
            path,
            UnitState::Deleted,
            Some(text),
            None,
            Some(Locator::Marker(locator)),
        )
    }

    /// The target unit, located by a one-based line of `code`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path.
    pub fn target_at_line(
        code: &str,
        line: usize,
        expected: &str,
        path: &str,
    ) -> Result<Self, WorkspaceError> {
        Self::declare(
            path,
            Self::state_for(code, expected),
            Some(code.to_owned()),
            Some(expected.to_owned()),
            Some(Locator::Line(LineLocator::new(line))),
        )
    }

    /// The target unit, located by an explicit byte span of `code`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidUnitPath`] for a malformed path.
    pub fn target_at_span(
        code: &str,
        span: TextSpan,
        expected: &str,
        path: &str,
    ) -> Result<Self, WorkspaceError> {
        Self::declare(
            path,
            Self::state_for(code, expected),
            Some(code.to_owned()),
            Some(expected.to_owned()),
            Some(Locator::Span(SpanLocator::new(span))),
        )
    }

    /// Key of the declared unit.
    #[must_use]
    pub const fn key(&self) -> &UnitKey {
        &self.key
    }

    /// Module name.
    #[must_use]
    pub fn module_name(&self) -> &str {
        self.key.module()
    }

    /// Unit name.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        self.key.name()
    }

    /// Folder segments.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        self.key.folders()
    }

    /// Expected lifecycle.
    #[must_use]
    pub const fn state(&self) -> UnitState {
        self.state
    }

    /// Text before the transformation; `None` for new units.
    #[must_use]
    pub fn initial_text(&self) -> Option<&str> {
        self.initial_text.as_deref()
    }

    /// Text after the transformation; `None` for deleted units.
    #[must_use]
    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }

    /// Locator for the target unit.
    #[must_use]
    pub const fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    /// Returns true when this change designates the target unit.
    #[must_use]
    pub const fn is_target(&self) -> bool {
        self.locator.is_some()
    }
}

fn parse_markers(markup: &str, path: &str) -> Result<(MarkerLocator, String), WorkspaceError> {
    MarkerLocator::parse(markup, path).map_err(WorkspaceError::Locate)
}
