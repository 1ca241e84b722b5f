//! Findings reported by analysis providers.

use std::fmt;

use heddle_workspace::{Severity, TextSpan, UnitKey};

/// A diagnostic-like observation reported by an [`crate::AnalysisProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    id: String,
    severity: Severity,
    message: String,
    location: Option<(UnitKey, TextSpan)>,
}

impl Finding {
    /// Creates a finding with no location.
    #[must_use]
    pub fn new(id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a location.
    #[must_use]
    pub fn at(mut self, unit: UnitKey, span: TextSpan) -> Self {
        self.location = Some((unit, span));
        self
    }

    /// Finding identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Unit and span the finding refers to.
    #[must_use]
    pub fn location(&self) -> Option<(&UnitKey, TextSpan)> {
        self.location.as_ref().map(|(unit, span)| (unit, *span))
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.id, self.message)?;
        if let Some((unit, span)) = &self.location {
            write!(f, " at {unit}{span}")?;
        }
        Ok(())
    }
}
