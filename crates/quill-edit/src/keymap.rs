//! Key bindings — from key events to interactions.
//!
//! The bindings are fixed. Ctrl chords drive everything except plain text:
//!
//! | Chord        | Interaction          |
//! |--------------|----------------------|
//! | Ctrl+X       | quit                 |
//! | Ctrl+Z       | undo                 |
//! | Ctrl+A       | redo                 |
//! | Ctrl+I (Tab) | cursor up            |
//! | Ctrl+K       | cursor down          |
//! | Ctrl+U       | cursor left          |
//! | Ctrl+O       | cursor right         |
//! | Ctrl+Y       | cursor to line start |
//! | Ctrl+P       | cursor to line end   |
//! | Ctrl+J / Ctrl+M (Enter) | new line  |
//! | Ctrl+H (Backspace) | backspace      |
//! | Ctrl+D       | delete line          |
//!
//! Some chords are indistinguishable from named keys at the byte level
//! (Ctrl+I is Tab, Ctrl+J/M is Enter, Ctrl+H is Backspace), so the named
//! keys carry those bindings. Arrow keys, Home, and End map to the same
//! movements for anyone who expects them to work.
//!
//! Any printable character without Ctrl or Alt inserts itself. Everything
//! else is ignored.

use quill_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::operation::Operation;

/// One classified user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Apply an operation to the document.
    Edit(Operation),
    /// Reverse the most recent operation.
    Undo,
    /// Re-apply the most recently undone operation.
    Redo,
    /// Stop the editor.
    Quit,
}

/// Classify a key event. Returns `None` for unbound keys, which the
/// dispatcher silently ignores.
#[must_use]
pub fn classify(key: KeyEvent) -> Option<Interaction> {
    if key.modifiers.contains(Modifiers::CTRL) {
        let KeyCode::Char(ch) = key.code else {
            return None;
        };
        return match ch.to_ascii_lowercase() {
            'x' => Some(Interaction::Quit),
            'z' => Some(Interaction::Undo),
            'a' => Some(Interaction::Redo),
            'k' => Some(Interaction::Edit(Operation::cursor_down())),
            'u' => Some(Interaction::Edit(Operation::cursor_left())),
            'o' => Some(Interaction::Edit(Operation::cursor_right())),
            'y' => Some(Interaction::Edit(Operation::cursor_home())),
            'p' => Some(Interaction::Edit(Operation::cursor_end())),
            'd' => Some(Interaction::Edit(Operation::delete_line())),
            _ => None,
        };
    }

    if key.modifiers.contains(Modifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Char(ch) => Some(Interaction::Edit(Operation::insert_char(ch))),
        // Tab is Ctrl+I on the wire.
        KeyCode::Tab | KeyCode::Up => Some(Interaction::Edit(Operation::cursor_up())),
        KeyCode::Down => Some(Interaction::Edit(Operation::cursor_down())),
        KeyCode::Left => Some(Interaction::Edit(Operation::cursor_left())),
        KeyCode::Right => Some(Interaction::Edit(Operation::cursor_right())),
        KeyCode::Home => Some(Interaction::Edit(Operation::cursor_home())),
        KeyCode::End => Some(Interaction::Edit(Operation::cursor_end())),
        // Enter is Ctrl+J / Ctrl+M on the wire.
        KeyCode::Enter => Some(Interaction::Edit(Operation::insert_newline())),
        // Backspace is Ctrl+H on the wire.
        KeyCode::Backspace => Some(Interaction::Edit(Operation::backspace())),
        KeyCode::Escape | KeyCode::Delete => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::ctrl(ch)
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    // -- Control interactions -----------------------------------------------

    #[test]
    fn ctrl_x_quits() {
        assert_eq!(classify(ctrl('x')), Some(Interaction::Quit));
    }

    #[test]
    fn ctrl_z_undoes() {
        assert_eq!(classify(ctrl('z')), Some(Interaction::Undo));
    }

    #[test]
    fn ctrl_a_redoes() {
        assert_eq!(classify(ctrl('a')), Some(Interaction::Redo));
    }

    // -- Movement chords ----------------------------------------------------

    #[test]
    fn movement_chords() {
        assert_eq!(
            classify(ctrl('k')),
            Some(Interaction::Edit(Operation::cursor_down()))
        );
        assert_eq!(
            classify(ctrl('u')),
            Some(Interaction::Edit(Operation::cursor_left()))
        );
        assert_eq!(
            classify(ctrl('o')),
            Some(Interaction::Edit(Operation::cursor_right()))
        );
        assert_eq!(
            classify(ctrl('y')),
            Some(Interaction::Edit(Operation::cursor_home()))
        );
        assert_eq!(
            classify(ctrl('p')),
            Some(Interaction::Edit(Operation::cursor_end()))
        );
    }

    #[test]
    fn tab_is_cursor_up() {
        // Ctrl+I arrives as the Tab byte.
        assert_eq!(
            classify(plain(KeyCode::Tab)),
            Some(Interaction::Edit(Operation::cursor_up()))
        );
    }

    #[test]
    fn arrow_keys_move() {
        assert_eq!(
            classify(plain(KeyCode::Up)),
            Some(Interaction::Edit(Operation::cursor_up()))
        );
        assert_eq!(
            classify(plain(KeyCode::Down)),
            Some(Interaction::Edit(Operation::cursor_down()))
        );
        assert_eq!(
            classify(plain(KeyCode::Left)),
            Some(Interaction::Edit(Operation::cursor_left()))
        );
        assert_eq!(
            classify(plain(KeyCode::Right)),
            Some(Interaction::Edit(Operation::cursor_right()))
        );
    }

    #[test]
    fn home_and_end_keys() {
        assert_eq!(
            classify(plain(KeyCode::Home)),
            Some(Interaction::Edit(Operation::cursor_home()))
        );
        assert_eq!(
            classify(plain(KeyCode::End)),
            Some(Interaction::Edit(Operation::cursor_end()))
        );
    }

    // -- Edit chords --------------------------------------------------------

    #[test]
    fn enter_inserts_newline() {
        // Ctrl+J and Ctrl+M arrive as the Enter byte.
        assert_eq!(
            classify(plain(KeyCode::Enter)),
            Some(Interaction::Edit(Operation::insert_newline()))
        );
    }

    #[test]
    fn backspace_key() {
        // Ctrl+H arrives as the Backspace byte.
        assert_eq!(
            classify(plain(KeyCode::Backspace)),
            Some(Interaction::Edit(Operation::backspace()))
        );
    }

    #[test]
    fn ctrl_d_deletes_line() {
        assert_eq!(
            classify(ctrl('d')),
            Some(Interaction::Edit(Operation::delete_line()))
        );
    }

    // -- Plain characters ---------------------------------------------------

    #[test]
    fn plain_char_inserts() {
        assert_eq!(
            classify(plain(KeyCode::Char('q'))),
            Some(Interaction::Edit(Operation::insert_char('q')))
        );
    }

    #[test]
    fn unicode_char_inserts() {
        assert_eq!(
            classify(plain(KeyCode::Char('é'))),
            Some(Interaction::Edit(Operation::insert_char('é')))
        );
    }

    #[test]
    fn uppercase_ctrl_chord_matches() {
        // Shift+Ctrl+X still quits.
        assert_eq!(classify(ctrl('X')), Some(Interaction::Quit));
    }

    // -- Unbound keys -------------------------------------------------------

    #[test]
    fn unbound_ctrl_chord_ignored() {
        assert_eq!(classify(ctrl('q')), None);
    }

    #[test]
    fn escape_is_ignored() {
        assert_eq!(classify(plain(KeyCode::Escape)), None);
    }

    #[test]
    fn delete_key_is_ignored() {
        assert_eq!(classify(plain(KeyCode::Delete)), None);
    }

    #[test]
    fn alt_char_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: Modifiers::ALT,
        };
        assert_eq!(classify(key), None);
    }

    #[test]
    fn ctrl_named_key_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Up,
            modifiers: Modifiers::CTRL,
        };
        assert_eq!(classify(key), None);
    }
}
