//! Text span and line index types for source location tracking.
//!
//! Every token carries a byte offset into the scanned input. These types
//! turn offsets into spans and line/column pairs for diagnostics.

use std::fmt;

/// A position in scanned input, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in scanned input, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create a span from `usize` byte offsets. Offsets beyond
    /// `TextPos::MAX` are clamped to it.
    #[inline]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::from_bounds(text_pos(start), text_pos(end))
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

/// Convert a byte offset to a `TextPos`, saturating at `TextPos::MAX`.
#[inline]
pub fn text_pos(offset: usize) -> TextPos {
    TextPos::try_from(offset).unwrap_or(TextPos::MAX)
}

/// Line and column information derived from scanned input.
///
/// Both values are 1-based, matching the `line` carried by tokens.
/// The column counts bytes, not characters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LineAndColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A map from byte offsets to line numbers, built from raw input.
///
/// Only line feed (`\n`) starts a new line; a carriage return is ordinary
/// whitespace, the same rule the scanner applies when counting lines.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from raw input bytes.
    pub fn new(text: &[u8]) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr::memchr_iter(b'\n', text).map(|i| text_pos(i + 1)));
        Self { line_starts }
    }

    /// Get the 1-based line number for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(index) => index as u32 + 1,
            Err(index) => index as u32,
        }
    }

    /// Get the line and column (both 1-based) for a byte offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize - 1];
        LineAndColumn {
            line,
            column: pos - line_start + 1,
        }
    }
}
