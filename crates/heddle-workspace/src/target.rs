//! Target-unit resolution: finding the unit a provider is invoked on.

use crate::change::SourceUnitChange;
use crate::error::{LocateError, WorkspaceError};
use crate::locator::{Locator, ResolvedLocation};
use crate::span::TextSpan;
use crate::workspace::{UnitKey, Workspace};

/// The unit carrying the scenario's locator and the span it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUnit {
    key: UnitKey,
    locator: Locator,
    location: ResolvedLocation,
}

impl TargetUnit {
    /// Key of the target unit.
    #[must_use]
    pub const fn key(&self) -> &UnitKey {
        &self.key
    }

    /// Locator the target was declared with.
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Resolved location.
    #[must_use]
    pub const fn location(&self) -> &ResolvedLocation {
        &self.location
    }

    /// Resolved span.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        self.location.span()
    }
}

/// Finds the single change carrying a locator and resolves it against the
/// built workspace.
///
/// # Errors
///
/// Returns [`WorkspaceError::NoTargetUnit`] or
/// [`WorkspaceError::MultipleTargetUnits`] when the changes do not name
/// exactly one target, and [`WorkspaceError::Locate`] when the locator does
/// not resolve inside the built unit.
pub fn resolve_target(
    workspace: &Workspace,
    changes: &[SourceUnitChange],
) -> Result<TargetUnit, WorkspaceError> {
    let mut targets = changes
        .iter()
        .filter_map(|change| change.locator().map(|locator| (change, locator)));
    let Some((change, locator)) = targets.next() else {
        return Err(WorkspaceError::NoTargetUnit);
    };
    let extra: Vec<String> = targets.map(|(other, _)| other.key().to_string()).collect();
    if !extra.is_empty() {
        let mut units = vec![change.key().to_string()];
        units.extend(extra);
        return Err(WorkspaceError::MultipleTargetUnits { units });
    }

    let key = change.key();
    let unit = workspace
        .unit(key)
        .ok_or_else(|| LocateError::not_found(key.name(), locator.describe()))?;
    let location = locator.resolve(key.name(), unit.text())?;
    Ok(TargetUnit {
        key: key.clone(),
        locator: *locator,
        location,
    })
}
