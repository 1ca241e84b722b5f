//! Byte-offset spans and line arithmetic over source text.

use std::fmt;

/// A half-open byte range `[start, end)` within a source unit's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextSpan {
    start: usize,
    end: usize,
}

impl TextSpan {
    /// Creates a span between two offsets as given.
    ///
    /// Reversed bounds produce an inverted span that never fits any text.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at `offset`.
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Inclusive start offset.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true when `start` lies past `end`.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Returns true for zero-length spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true when the two spans overlap or touch.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns true when `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true when the span addresses valid character boundaries of
    /// `text`.
    #[must_use]
    pub fn fits(&self, text: &str) -> bool {
        !self.is_inverted()
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }

    /// Returns the text covered by this span, if it fits.
    #[must_use]
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start..self.end)
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

/// Computes the byte offset of each line start.
///
/// Handles both LF and CRLF endings by scanning for `\n` rather than assuming
/// a fixed terminator width.
fn line_start_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (idx, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            offsets.push(idx + 1);
        }
    }
    offsets
}

/// Returns the content span of every line, terminators excluded.
#[must_use]
pub fn line_spans(text: &str) -> Vec<TextSpan> {
    let starts = line_start_offsets(text);
    let bytes = text.as_bytes();
    starts
        .iter()
        .enumerate()
        .map(|(idx, &start)| {
            let line_end = starts.get(idx + 1).copied().unwrap_or(text.len());
            let mut content_end = line_end;
            if content_end > start && bytes.get(content_end - 1) == Some(&b'\n') {
                content_end -= 1;
                if content_end > start && bytes.get(content_end - 1) == Some(&b'\r') {
                    content_end -= 1;
                }
            }
            TextSpan::new(start, content_end)
        })
        .collect()
}

/// Returns the span of the given one-based line, terminator excluded.
#[must_use]
pub fn line_span(text: &str, line: usize) -> Option<TextSpan> {
    let index = line.checked_sub(1)?;
    line_spans(text).get(index).copied()
}

/// Returns the one-based line containing `offset`.
#[must_use]
pub fn line_of_offset(text: &str, offset: usize) -> Option<usize> {
    if offset > text.len() {
        return None;
    }
    let starts = line_start_offsets(text);
    Some(starts.partition_point(|&start| start <= offset))
}
