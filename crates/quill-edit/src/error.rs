//! Recoverable editing errors.
//!
//! These are not failures of the program — they are the document refusing
//! an operation that makes no sense in its current state, like moving the
//! cursor above the first line. The dispatcher catches them, shows the
//! message to the user, and carries on. An operation that returns one of
//! these has left the document completely untouched.

use thiserror::Error;

/// Why an operation could not be applied.
///
/// The `Display` text is shown verbatim in the editor's message line, so
/// every variant carries a short, user-facing phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// Cursor-up with the cursor already on line 0.
    #[error("Already at top line")]
    AtTopLine,

    /// Cursor-down with the cursor already on the last line.
    #[error("Already at bottom line")]
    AtBottomLine,

    /// Cursor-left with the cursor already at column 0.
    #[error("Already at beginning of line")]
    AtLineStart,

    /// Cursor-right with the cursor already past the last character.
    #[error("Already at end of line")]
    AtLineEnd,

    /// Backspace at the very start of the document.
    #[error("Already at beginning of file")]
    AtFileStart,
}
