//! Document — text storage plus the cursor.
//!
//! A `Document` wraps a [`ropey::Rope`] with coordinate conversion between
//! `Position` (line, col) and rope char indices, low-level text mutation,
//! and the cursor. The cursor lives here rather than in a separate layer
//! because every operation needs to read and move it in lockstep with the
//! text it changes.
//!
//! # Design choices
//!
//! - **ropey** provides O(log n) insert/delete at any position, efficient
//!   line indexing, and battle-tested Unicode handling. We build a clean API
//!   on top rather than reimplementing text data structures.
//!
//! - **Columns are char offsets**, not byte offsets. Column 3 of `"café"`
//!   is `'é'`, not a byte in the middle of its UTF-8 encoding. Byte offsets
//!   never leak into the public API.
//!
//! - **The cursor column ranges over `0..=line_content_len`** — it may sit
//!   one past the last character of its line, where typed text lands.
//!
//! - **No undo/redo here.** Operations record what they need to reverse
//!   themselves; the document only mutates.

use std::fmt;

use ropey::Rope;

use crate::position::Position;

/// Text content and cursor of one editing session.
///
/// All positions are 0-indexed `(line, col)` pairs. Columns count Unicode
/// scalar values (chars). Use [`pos_to_char_idx`](Self::pos_to_char_idx) and
/// [`char_idx_to_pos`](Self::char_idx_to_pos) for conversion to rope-native
/// char indices.
pub struct Document {
    rope: Rope,
    cursor: Position,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty document with the cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor: Position::ZERO,
        }
    }

    /// Create a document from a string. The cursor starts at the origin.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Position::ZERO,
        }
    }

    // -- Cursor -------------------------------------------------------------

    /// The current cursor position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor, clamping to the nearest valid position.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp_position(pos);
    }

    // -- Text access --------------------------------------------------------

    /// Total number of lines. An empty document has 1 line (the empty line).
    /// A document ending with `\n` has a trailing empty line — this matches
    /// how editors display files.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the document contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of chars in a line **excluding** any trailing `\n`. This is
    /// the content length — valid cursor columns are `0..=content_len`.
    ///
    /// Returns `None` if the line doesn't exist.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let rope_line = self.rope.line(line);
        let total = rope_line.len_chars();
        if total > 0 && rope_line.char(total - 1) == '\n' {
            Some(total - 1)
        } else {
            Some(total)
        }
    }

    /// A line's content as a `String`, excluding any trailing `\n`.
    /// Returns `None` if the line doesn't exist. Allocates.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<String> {
        let len = self.line_content_len(line)?;
        let slice = self.rope.line(line);
        Some(slice.slice(..len).to_string())
    }

    /// The character at a position. Returns `None` if out of bounds.
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        let idx = self.pos_to_char_idx(pos)?;
        if idx < self.rope.len_chars() {
            Some(self.rope.char(idx))
        } else {
            None
        }
    }

    /// Collect all text into a `String`. Allocates.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a `Position` (line, col) to an absolute char index in the rope.
    ///
    /// Returns `None` if the line is out of bounds or the column exceeds the
    /// line's total char count (including line ending). A column exactly equal
    /// to the line's char count is valid — it represents the position just past
    /// the last character.
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() {
            return None;
        }
        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();
        if pos.col > line_len {
            return None;
        }
        Some(line_start + pos.col)
    }

    /// Convert an absolute char index to a `Position` (line, col).
    ///
    /// Returns `None` if `char_idx > len_chars()`. An index equal to
    /// `len_chars()` returns the position just past the last character.
    #[must_use]
    pub fn char_idx_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        Some(Position::new(line, char_idx - line_start))
    }

    /// Clamp a position to the nearest valid cursor position.
    ///
    /// - If `line >= line_count()`, clamps to the last line.
    /// - If `col > line_content_len()`, clamps to `line_content_len()`.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        if self.is_empty() {
            return Position::ZERO;
        }

        let line = pos.line.min(self.line_count() - 1);
        let max_col = self.line_content_len(line).unwrap_or(0);
        let col = pos.col.min(max_col);

        Position::new(line, col)
    }

    // -- Editing ------------------------------------------------------------

    /// Insert text at a position.
    ///
    /// The position must be valid (see [`pos_to_char_idx`](Self::pos_to_char_idx)).
    /// The cursor does not move — callers adjust it to match the edit.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not a valid position in the document.
    pub fn insert_at(&mut self, pos: Position, text: &str) {
        let idx = self
            .pos_to_char_idx(pos)
            .expect("insert position out of bounds");
        self.rope.insert(idx, text);
    }

    /// Delete `count` chars starting at a position, returning the removed
    /// text. The cursor does not move — callers adjust it to match.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not valid or the range extends past the end of
    /// the document.
    pub fn delete_at(&mut self, pos: Position, count: usize) -> String {
        let start = self
            .pos_to_char_idx(pos)
            .expect("delete position out of bounds");
        let end = start + count;
        assert!(end <= self.rope.len_chars(), "delete range out of bounds");
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        removed
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
