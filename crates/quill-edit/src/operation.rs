//! Reversible edit and movement operations.
//!
//! An [`Operation`] is the unit of undo: everything the user does to the
//! document — typing a character, moving the cursor, deleting a line — is
//! one of these. Applying an operation either succeeds and records whatever
//! it needs to reverse itself, or fails with an [`EditError`] and leaves
//! the document completely untouched.
//!
//! # Lifecycle
//!
//! An operation is applied at most once before being undone, and undone at
//! most once before being re-applied. The history enforces this by moving
//! each operation between the undo and redo stacks — an operation is never
//! in both. Because undo runs in strict LIFO order, an operation's `undo`
//! always sees the document exactly as `apply` left it, which is why
//! several variants can re-derive their reverse from the cursor alone.

use crate::document::Document;
use crate::error::EditError;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Capture records
// ---------------------------------------------------------------------------

/// What a backspace removed, captured for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackspaceRecord {
    /// A single character was deleted before the cursor.
    Char(char),
    /// The cursor was at column 0 and the line was joined with the one above.
    JoinedLine,
}

/// A deleted line, captured for undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLine {
    /// Cursor position before the delete.
    cursor: Position,
    /// Line content without its newline.
    text: String,
    /// Whether the line carried a trailing newline (false only for the
    /// last line of the document).
    had_newline: bool,
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One reversible action on a document.
///
/// Variants with fields use them to capture undo state during `apply`;
/// construct operations through the associated functions, which leave the
/// capture fields empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert a character at the cursor; the cursor moves right past it.
    InsertChar(char),
    /// Split the current line at the cursor; the cursor moves to the start
    /// of the new line.
    InsertNewline,
    /// Move the cursor up one line, clamping the column to the new line's
    /// length. Captures the position before the move.
    CursorUp { prev: Option<Position> },
    /// Move the cursor down one line, clamping the column. Captures the
    /// position before the move.
    CursorDown { prev: Option<Position> },
    /// Move the cursor one column left.
    CursorLeft,
    /// Move the cursor one column right.
    CursorRight,
    /// Move the cursor to column 0. Captures the position before the move.
    CursorHome { prev: Option<Position> },
    /// Move the cursor past the last character of the line. Captures the
    /// position before the move.
    CursorEnd { prev: Option<Position> },
    /// Delete the character before the cursor, or join with the previous
    /// line when the cursor is at column 0.
    Backspace { removed: Option<BackspaceRecord> },
    /// Delete the entire cursor line.
    DeleteLine { removed: Option<RemovedLine> },
}

impl Operation {
    // -- Constructors -------------------------------------------------------

    #[must_use]
    pub const fn insert_char(ch: char) -> Self {
        Self::InsertChar(ch)
    }

    #[must_use]
    pub const fn insert_newline() -> Self {
        Self::InsertNewline
    }

    #[must_use]
    pub const fn cursor_up() -> Self {
        Self::CursorUp { prev: None }
    }

    #[must_use]
    pub const fn cursor_down() -> Self {
        Self::CursorDown { prev: None }
    }

    #[must_use]
    pub const fn cursor_left() -> Self {
        Self::CursorLeft
    }

    #[must_use]
    pub const fn cursor_right() -> Self {
        Self::CursorRight
    }

    #[must_use]
    pub const fn cursor_home() -> Self {
        Self::CursorHome { prev: None }
    }

    #[must_use]
    pub const fn cursor_end() -> Self {
        Self::CursorEnd { prev: None }
    }

    #[must_use]
    pub const fn backspace() -> Self {
        Self::Backspace { removed: None }
    }

    #[must_use]
    pub const fn delete_line() -> Self {
        Self::DeleteLine { removed: None }
    }

    // -- Apply --------------------------------------------------------------

    /// Apply this operation to the document.
    ///
    /// On success the operation has captured whatever it needs for
    /// [`undo`](Self::undo). On failure the document is untouched and the
    /// operation must be discarded, not recorded.
    ///
    /// # Errors
    ///
    /// Returns an [`EditError`] when the operation makes no sense in the
    /// document's current state (cursor at a boundary).
    pub fn apply(&mut self, doc: &mut Document) -> Result<(), EditError> {
        let cursor = doc.cursor();

        match self {
            Self::InsertChar(ch) => {
                doc.insert_at(cursor, &ch.to_string());
                doc.set_cursor(Position::new(cursor.line, cursor.col + 1));
                Ok(())
            }

            Self::InsertNewline => {
                doc.insert_at(cursor, "\n");
                doc.set_cursor(Position::new(cursor.line + 1, 0));
                Ok(())
            }

            Self::CursorUp { prev } => {
                if cursor.line == 0 {
                    return Err(EditError::AtTopLine);
                }
                *prev = Some(cursor);
                doc.set_cursor(Position::new(cursor.line - 1, cursor.col));
                Ok(())
            }

            Self::CursorDown { prev } => {
                if cursor.line + 1 >= doc.line_count() {
                    return Err(EditError::AtBottomLine);
                }
                *prev = Some(cursor);
                doc.set_cursor(Position::new(cursor.line + 1, cursor.col));
                Ok(())
            }

            Self::CursorLeft => {
                if cursor.col == 0 {
                    return Err(EditError::AtLineStart);
                }
                doc.set_cursor(Position::new(cursor.line, cursor.col - 1));
                Ok(())
            }

            Self::CursorRight => {
                let len = doc.line_content_len(cursor.line).unwrap_or(0);
                if cursor.col >= len {
                    return Err(EditError::AtLineEnd);
                }
                doc.set_cursor(Position::new(cursor.line, cursor.col + 1));
                Ok(())
            }

            Self::CursorHome { prev } => {
                *prev = Some(cursor);
                doc.set_cursor(Position::new(cursor.line, 0));
                Ok(())
            }

            Self::CursorEnd { prev } => {
                *prev = Some(cursor);
                let len = doc.line_content_len(cursor.line).unwrap_or(0);
                doc.set_cursor(Position::new(cursor.line, len));
                Ok(())
            }

            Self::Backspace { removed } => {
                if cursor.col > 0 {
                    let target = Position::new(cursor.line, cursor.col - 1);
                    let text = doc.delete_at(target, 1);
                    let ch = text.chars().next().unwrap_or('\0');
                    *removed = Some(BackspaceRecord::Char(ch));
                    doc.set_cursor(target);
                    Ok(())
                } else if cursor.line > 0 {
                    // Column 0: join with the previous line by deleting
                    // its trailing newline.
                    let prev_len = doc.line_content_len(cursor.line - 1).unwrap_or(0);
                    let join_at = Position::new(cursor.line - 1, prev_len);
                    doc.delete_at(join_at, 1);
                    *removed = Some(BackspaceRecord::JoinedLine);
                    doc.set_cursor(join_at);
                    Ok(())
                } else {
                    Err(EditError::AtFileStart)
                }
            }

            Self::DeleteLine { removed } => {
                let line = cursor.line;
                let text = doc.line_text(line).unwrap_or_default();
                let text_chars = text.chars().count();
                let had_newline = line + 1 < doc.line_count();

                if had_newline {
                    doc.delete_at(Position::new(line, 0), text_chars + 1);
                    doc.set_cursor(Position::new(line, cursor.col));
                } else if line > 0 {
                    // Last line: remove its content and the newline that
                    // separated it from the line above.
                    let prev_len = doc.line_content_len(line - 1).unwrap_or(0);
                    doc.delete_at(Position::new(line - 1, prev_len), text_chars + 1);
                    doc.set_cursor(Position::new(line - 1, cursor.col));
                } else {
                    // Only line in the document: clear it.
                    doc.delete_at(Position::ZERO, text_chars);
                    doc.set_cursor(Position::ZERO);
                }

                *removed = Some(RemovedLine {
                    cursor,
                    text,
                    had_newline,
                });
                Ok(())
            }
        }
    }

    // -- Undo ---------------------------------------------------------------

    /// Reverse a previously applied operation.
    ///
    /// Must only be called when this operation was the most recent change
    /// to the document — the history's LIFO discipline guarantees the
    /// document is in exactly the state `apply` left it.
    pub fn undo(&self, doc: &mut Document) {
        let cursor = doc.cursor();

        match self {
            Self::InsertChar(_) => {
                // Cursor sits just past the inserted character.
                if cursor.col > 0 {
                    let target = Position::new(cursor.line, cursor.col - 1);
                    doc.delete_at(target, 1);
                    doc.set_cursor(target);
                }
            }

            Self::InsertNewline => {
                // Cursor sits at the start of the line the split created.
                if cursor.line > 0 {
                    let prev_len = doc.line_content_len(cursor.line - 1).unwrap_or(0);
                    let split_at = Position::new(cursor.line - 1, prev_len);
                    doc.delete_at(split_at, 1);
                    doc.set_cursor(split_at);
                }
            }

            Self::CursorUp { prev }
            | Self::CursorDown { prev }
            | Self::CursorHome { prev }
            | Self::CursorEnd { prev } => {
                if let Some(pos) = prev {
                    doc.set_cursor(*pos);
                }
            }

            Self::CursorLeft => {
                doc.set_cursor(Position::new(cursor.line, cursor.col + 1));
            }

            Self::CursorRight => {
                if cursor.col > 0 {
                    doc.set_cursor(Position::new(cursor.line, cursor.col - 1));
                }
            }

            Self::Backspace { removed } => match removed {
                Some(BackspaceRecord::Char(ch)) => {
                    doc.insert_at(cursor, &ch.to_string());
                    doc.set_cursor(Position::new(cursor.line, cursor.col + 1));
                }
                Some(BackspaceRecord::JoinedLine) => {
                    doc.insert_at(cursor, "\n");
                    doc.set_cursor(Position::new(cursor.line + 1, 0));
                }
                None => {}
            },

            Self::DeleteLine { removed } => {
                if let Some(record) = removed {
                    if record.had_newline {
                        let mut restored = record.text.clone();
                        restored.push('\n');
                        doc.insert_at(Position::new(record.cursor.line, 0), &restored);
                    } else if record.cursor.line > 0 {
                        // The line was the document's last: re-append it.
                        let last = doc.line_count() - 1;
                        let end = Position::new(last, doc.line_content_len(last).unwrap_or(0));
                        let mut restored = String::from("\n");
                        restored.push_str(&record.text);
                        doc.insert_at(end, &restored);
                    } else {
                        doc.insert_at(Position::ZERO, &record.text);
                    }
                    doc.set_cursor(record.cursor);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
