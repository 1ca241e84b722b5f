//! Location resolution inside a source unit.
//!
//! A [`Locator`] names a region of a unit's text in one of three styles:
//! inline `[|`…`|]` markers embedded in the declared markup, a one-based line
//! number, or an explicit byte span. All styles resolve to a [`TextSpan`] over
//! the marker-free text that the workspace actually holds.

use std::fmt;

use crate::error::LocateError;
use crate::span::{TextSpan, line_span};
use crate::workspace::SourceUnit;

/// Opening marker delimiting the target region in markup.
pub const MARKER_START: &str = "[|";

/// Closing marker delimiting the target region in markup.
pub const MARKER_END: &str = "|]";

/// Removes every location marker from `markup`.
///
/// Stripping repeats until no marker remains, so stripping already stripped
/// text returns it unchanged.
#[must_use]
pub fn strip_markers(markup: &str) -> String {
    let mut text = markup.to_owned();
    while text.contains(MARKER_START) || text.contains(MARKER_END) {
        text = text.replace(MARKER_START, "").replace(MARKER_END, "");
    }
    text
}

fn contains_marker(text: &str) -> bool {
    text.contains(MARKER_START) || text.contains(MARKER_END)
}

/// A resolved location: the unit it lives in and the span it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedLocation {
    unit: String,
    span: TextSpan,
}

impl ResolvedLocation {
    /// Creates a resolved location.
    #[must_use]
    pub fn new(unit: impl Into<String>, span: TextSpan) -> Self {
        Self {
            unit: unit.into(),
            span,
        }
    }

    /// Name of the unit containing the location.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Span covered by the location.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        self.span
    }

    /// Returns true when a reported span intersects this location.
    #[must_use]
    pub const fn matches(&self, span: &TextSpan) -> bool {
        self.span.intersects(span)
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.unit, self.span)
    }
}

/// Location taken from a single `[|`…`|]` pair in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerLocator {
    span: TextSpan,
}

impl MarkerLocator {
    /// Parses the marker pair out of the markup declared for `unit`,
    /// returning the locator and the stripped text.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::LocationNotFound`] when the markup carries no
    /// complete pair and [`LocateError::AmbiguousLocation`] when it carries
    /// more than one marker of either kind or the markers are out of order.
    /// Both name `unit`.
    pub fn parse(markup: &str, unit: &str) -> Result<(Self, String), LocateError> {
        const DESCRIPTION: &str = "marker";
        let starts: Vec<usize> = markup.match_indices(MARKER_START).map(|(i, _)| i).collect();
        let ends: Vec<usize> = markup.match_indices(MARKER_END).map(|(i, _)| i).collect();

        let (start, end) = match (starts.as_slice(), ends.as_slice()) {
            ([start], [end]) => (*start, *end),
            ([], []) | ([_], []) | ([], [_]) => {
                return Err(LocateError::not_found(unit, DESCRIPTION));
            }
            _ => {
                return Err(LocateError::ambiguous(
                    unit,
                    DESCRIPTION,
                    format!(
                        "found {} opening and {} closing markers",
                        starts.len(),
                        ends.len()
                    ),
                ));
            }
        };

        if end < start + MARKER_START.len() {
            return Err(LocateError::ambiguous(
                unit,
                DESCRIPTION,
                "closing marker precedes opening marker",
            ));
        }

        let before = markup.get(..start);
        let inner = markup.get(start + MARKER_START.len()..end);
        let after = markup.get(end + MARKER_END.len()..);
        let (Some(before), Some(inner), Some(after)) = (before, inner, after) else {
            return Err(LocateError::not_found(unit, DESCRIPTION));
        };

        let stripped = format!("{before}{inner}{after}");
        if contains_marker(&stripped) {
            return Err(LocateError::ambiguous(
                unit,
                DESCRIPTION,
                "markers remain after stripping",
            ));
        }

        let span_start = before.len();
        let locator = Self {
            span: TextSpan::new(span_start, span_start + inner.len()),
        };
        Ok((locator, stripped))
    }

    /// Span of the marked region in the stripped text.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        self.span
    }
}

/// Location of a whole line, terminator excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLocator {
    line: usize,
}

impl LineLocator {
    /// Creates a locator for the given one-based line.
    #[must_use]
    pub const fn new(line: usize) -> Self {
        Self { line }
    }

    /// One-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Resolves `line` against raw code.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::LocationNotFound`] for line zero or a line past
    /// the end of the text.
    pub fn from_code(code: &str, line: usize) -> Result<TextSpan, LocateError> {
        let locator = Self::new(line);
        line_span(code, line).ok_or_else(|| LocateError::not_found("", locator.describe()))
    }

    /// Resolves `line` against a built unit.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::LocationNotFound`] for line zero or a line past
    /// the end of the unit.
    pub fn from_unit(unit: &SourceUnit, line: usize) -> Result<ResolvedLocation, LocateError> {
        let name = unit.key().name();
        let span = Self::from_code(unit.text(), line).map_err(|err| err.in_unit(name))?;
        Ok(ResolvedLocation::new(name, span))
    }

    fn describe(self) -> String {
        format!("line {}", self.line)
    }
}

/// An explicit byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLocator {
    span: TextSpan,
}

impl SpanLocator {
    /// Creates a locator for an explicit span.
    #[must_use]
    pub const fn new(span: TextSpan) -> Self {
        Self { span }
    }

    /// The requested span.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        self.span
    }
}

/// The closed set of location styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Inline marker pair.
    Marker(MarkerLocator),
    /// One-based line number.
    Line(LineLocator),
    /// Explicit byte span.
    Span(SpanLocator),
}

impl Locator {
    /// Convenience constructor for a line locator.
    #[must_use]
    pub const fn line(line: usize) -> Self {
        Self::Line(LineLocator::new(line))
    }

    /// Convenience constructor for a span locator.
    #[must_use]
    pub const fn span(span: TextSpan) -> Self {
        Self::Span(SpanLocator::new(span))
    }

    /// Resolves this locator against the marker-free text of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::InvertedSpan`] for an explicit span that
    /// starts after it ends, and [`LocateError::LocationNotFound`] when the
    /// location falls outside the text or splits a character.
    pub fn resolve(&self, unit: &str, text: &str) -> Result<ResolvedLocation, LocateError> {
        let span = match self {
            Self::Marker(marker) => marker.span(),
            Self::Span(explicit) if explicit.span().is_inverted() => {
                return Err(LocateError::inverted(unit, explicit.span()));
            }
            Self::Span(explicit) => explicit.span(),
            Self::Line(line) => {
                LineLocator::from_code(text, line.line()).map_err(|err| err.in_unit(unit))?
            }
        };
        if !span.fits(text) {
            return Err(LocateError::not_found(unit, self.describe()));
        }
        Ok(ResolvedLocation::new(unit, span))
    }

    /// Returns true when `span` intersects the location this locator
    /// resolves to within `text`.
    #[must_use]
    pub fn matches(&self, text: &str, span: &TextSpan) -> bool {
        self.resolve("", text)
            .is_ok_and(|location| location.matches(span))
    }

    /// Human description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Marker(marker) => format!("marker {}", marker.span()),
            Self::Line(line) => line.describe(),
            Self::Span(explicit) => format!("span {}", explicit.span()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
