//! The interaction loop — keys in, document changes out.
//!
//! [`Dispatcher::run`] blocks on the next key event, classifies it through
//! the [`keymap`](crate::keymap), routes the resulting interaction, and has
//! the presenter repaint. The loop runs until the user quits or input hits
//! EOF.
//!
//! # Contract
//!
//! - Every handled interaction ends with a `refresh`, failed ones included.
//! - A failed operation is discarded; it never reaches the history.
//! - Undo/redo on an empty stack shows `"Undo Empty"` / `"Redo Empty"`.
//! - Successful interactions clear any previous error message.
//! - Both history stacks are dropped when the loop ends.
//!
//! The two traits here are the seams that make the loop testable: tests
//! drive it with a scripted [`InputSource`] and observe a recording
//! [`Presenter`], no terminal involved.

use std::io;

use quill_term::input::KeyEvent;
use quill_term::keyboard::Keyboard;

use crate::document::Document;
use crate::history::{History, RedoPolicy};
use crate::keymap::{self, Interaction};

/// Source of key events. Blocking.
pub trait InputSource {
    /// Block until the next key event.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] when the source is
    /// exhausted, or any underlying read error.
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

impl InputSource for Keyboard {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        Self::next_key(self)
    }
}

/// Everything the dispatcher needs from a display.
pub trait Presenter {
    /// Repaint the document and cursor.
    ///
    /// # Errors
    ///
    /// Returns any underlying write error.
    fn refresh(&mut self, doc: &Document) -> io::Result<()>;

    /// Display an error message until the next [`clear_error`](Self::clear_error).
    ///
    /// # Errors
    ///
    /// Returns any underlying write error.
    fn show_error(&mut self, message: &str) -> io::Result<()>;

    /// Remove any displayed error message.
    ///
    /// # Errors
    ///
    /// Returns any underlying write error.
    fn clear_error(&mut self) -> io::Result<()>;
}

/// Owns the document, the history, and the loop that connects them to
/// the user.
pub struct Dispatcher<I, P> {
    document: Document,
    history: History,
    input: I,
    presenter: P,
}

impl<I: InputSource, P: Presenter> Dispatcher<I, P> {
    /// Create a dispatcher over an empty document.
    pub fn new(input: I, presenter: P) -> Self {
        Self::with_policy(input, presenter, RedoPolicy::default())
    }

    /// Create a dispatcher over an empty document with an explicit redo
    /// policy.
    pub fn with_policy(input: I, presenter: P, policy: RedoPolicy) -> Self {
        Self {
            document: Document::new(),
            history: History::new(policy),
            input,
            presenter,
        }
    }

    /// The document being edited.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The undo/redo history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// The presenter. Mainly useful for inspecting a recording presenter
    /// in tests.
    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Run the interaction loop until quit or end of input.
    ///
    /// # Errors
    ///
    /// Returns any presenter write error or input read error. EOF on
    /// input is not an error — the loop just ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.presenter.refresh(&self.document)?;

        loop {
            let key = match self.input.next_key() {
                Ok(key) => key,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err),
            };

            let Some(interaction) = keymap::classify(key) else {
                continue;
            };

            match interaction {
                Interaction::Quit => break,

                Interaction::Undo => {
                    if self.history.undo(&mut self.document) {
                        self.presenter.clear_error()?;
                    } else {
                        self.presenter.show_error("Undo Empty")?;
                    }
                }

                Interaction::Redo => {
                    if self.history.redo(&mut self.document) {
                        self.presenter.clear_error()?;
                    } else {
                        self.presenter.show_error("Redo Empty")?;
                    }
                }

                Interaction::Edit(mut op) => match op.apply(&mut self.document) {
                    Ok(()) => {
                        self.presenter.clear_error()?;
                        self.history.record(op);
                    }
                    // The operation left the document untouched; drop it.
                    Err(err) => self.presenter.show_error(&err.to_string())?,
                },
            }

            self.presenter.refresh(&self.document)?;
        }

        self.history.clear();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use quill_term::input::KeyCode;

    /// Scripted input: hands out key events in order, then reports EOF.
    struct Script {
        keys: Vec<KeyEvent>,
        next: usize,
    }

    impl Script {
        fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
            Self {
                keys: keys.into_iter().collect(),
                next: 0,
            }
        }
    }

    impl InputSource for Script {
        fn next_key(&mut self) -> io::Result<KeyEvent> {
            let Some(key) = self.keys.get(self.next) else {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script done"));
            };
            self.next += 1;
            Ok(*key)
        }
    }

    /// Records every presenter call for later inspection.
    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Refresh { contents: String, cursor: Position },
        ShowError(String),
        ClearError,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn errors(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::ShowError(msg) => Some(msg.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn refresh_count(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, Call::Refresh { .. }))
                .count()
        }
    }

    impl Presenter for Recorder {
        fn refresh(&mut self, doc: &Document) -> io::Result<()> {
            self.calls.push(Call::Refresh {
                contents: doc.contents(),
                cursor: doc.cursor(),
            });
            Ok(())
        }

        fn show_error(&mut self, message: &str) -> io::Result<()> {
            self.calls.push(Call::ShowError(message.to_string()));
            Ok(())
        }

        fn clear_error(&mut self) -> io::Result<()> {
            self.calls.push(Call::ClearError);
            Ok(())
        }
    }

    fn ch(c: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(c))
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::ctrl(c)
    }

    fn run_script(keys: impl IntoIterator<Item = KeyEvent>) -> Dispatcher<Script, Recorder> {
        let mut dispatcher = Dispatcher::new(Script::new(keys), Recorder::default());
        dispatcher.run().expect("run should not fail");
        dispatcher
    }

    // -- Basic loop ---------------------------------------------------------

    #[test]
    fn quit_immediately() {
        let d = run_script([ctrl('x')]);
        // Only the initial refresh.
        assert_eq!(d.presenter().refresh_count(), 1);
        assert_eq!(d.document().contents(), "");
    }

    #[test]
    fn eof_ends_the_loop() {
        let d = run_script([ch('a')]);
        assert_eq!(d.document().contents(), "a");
    }

    #[test]
    fn typing_builds_the_document() {
        let d = run_script([ch('h'), ch('i'), ctrl('x')]);
        assert_eq!(d.document().contents(), "hi");
        assert_eq!(d.document().cursor(), Position::new(0, 2));
    }

    #[test]
    fn every_interaction_refreshes() {
        let d = run_script([ch('a'), ch('b'), ctrl('z'), ctrl('x')]);
        // Initial + one per handled interaction (quit excluded).
        assert_eq!(d.presenter().refresh_count(), 4);
    }

    #[test]
    fn unbound_keys_are_ignored_without_refresh() {
        let d = run_script([KeyEvent::plain(KeyCode::Escape), ctrl('q'), ctrl('x')]);
        assert_eq!(d.presenter().refresh_count(), 1);
        assert!(d.presenter().errors().is_empty());
    }

    // -- Undo / redo --------------------------------------------------------

    #[test]
    fn undo_then_redo_round_trip() {
        let d = run_script([ch('a'), ch('b'), ctrl('z'), ctrl('z'), ctrl('a'), ctrl('x')]);
        // 'a', 'b' typed; both undone; one redone.
        assert_eq!(d.document().contents(), "a");
        assert_eq!(d.document().cursor(), Position::new(0, 1));
    }

    #[test]
    fn undo_empty_shows_message() {
        let d = run_script([ctrl('z'), ctrl('x')]);
        assert_eq!(d.presenter().errors(), ["Undo Empty"]);
    }

    #[test]
    fn redo_empty_shows_message() {
        let d = run_script([ctrl('a'), ctrl('x')]);
        assert_eq!(d.presenter().errors(), ["Redo Empty"]);
    }

    #[test]
    fn undo_empty_still_refreshes() {
        let d = run_script([ctrl('z'), ctrl('x')]);
        assert_eq!(d.presenter().refresh_count(), 2);
    }

    #[test]
    fn movements_participate_in_undo() {
        let d = run_script([ch('a'), ch('b'), ctrl('y'), ctrl('z'), ctrl('x')]);
        // Ctrl+Y moved home; the undo restores the cursor after 'b'.
        assert_eq!(d.document().contents(), "ab");
        assert_eq!(d.document().cursor(), Position::new(0, 2));
    }

    // -- Failing operations -------------------------------------------------

    #[test]
    fn failed_operation_shows_its_message() {
        // Cursor-left at the origin.
        let d = run_script([ctrl('u'), ctrl('x')]);
        assert_eq!(d.presenter().errors(), ["Already at beginning of line"]);
        assert_eq!(d.document().cursor(), Position::ZERO);
    }

    #[test]
    fn failed_operation_is_not_recorded() {
        // The failed cursor-left must not land on the undo stack, so the
        // following undo reports an empty stack.
        let d = run_script([ctrl('u'), ctrl('z'), ctrl('x')]);
        assert_eq!(
            d.presenter().errors(),
            ["Already at beginning of line", "Undo Empty"]
        );
    }

    #[test]
    fn failed_operation_still_refreshes() {
        let d = run_script([ctrl('u'), ctrl('x')]);
        assert_eq!(d.presenter().refresh_count(), 2);
    }

    #[test]
    fn success_after_failure_clears_the_error() {
        let d = run_script([ctrl('u'), ch('a'), ctrl('x')]);
        let calls = &d.presenter().calls;
        // The 'a' insert must clear the error before its refresh.
        assert!(calls
            .iter()
            .any(|call| matches!(call, Call::ClearError)));
        assert_eq!(d.document().contents(), "a");
    }

    // -- Quit semantics -----------------------------------------------------

    #[test]
    fn quit_does_not_refresh() {
        let d = run_script([ch('a'), ctrl('x')]);
        assert_eq!(d.presenter().refresh_count(), 2);
    }

    #[test]
    fn histories_are_dropped_on_quit() {
        let d = run_script([ch('a'), ch('b'), ctrl('z'), ctrl('x')]);
        assert!(!d.history().can_undo());
        assert!(!d.history().can_redo());
    }

    #[test]
    fn histories_are_dropped_on_eof() {
        let d = run_script([ch('a')]);
        assert!(!d.history().can_undo());
    }

    // -- Multi-line editing through the loop --------------------------------

    #[test]
    fn newline_and_backspace_flow() {
        let d = run_script([
            ch('h'),
            ch('i'),
            KeyEvent::plain(KeyCode::Enter),
            ch('!'),
            KeyEvent::plain(KeyCode::Backspace),
            KeyEvent::plain(KeyCode::Backspace), // joins the lines
            ctrl('x'),
        ]);
        assert_eq!(d.document().contents(), "hi");
        assert_eq!(d.document().cursor(), Position::new(0, 2));
    }

    #[test]
    fn delete_line_and_undo_through_the_loop() {
        let d = run_script([
            ch('a'),
            KeyEvent::plain(KeyCode::Enter),
            ch('b'),
            ctrl('d'), // delete line "b"
            ctrl('z'), // bring it back
            ctrl('x'),
        ]);
        assert_eq!(d.document().contents(), "a\nb");
        assert_eq!(d.document().cursor(), Position::new(1, 1));
    }

    #[test]
    fn redo_policy_is_configurable() {
        let mut dispatcher = Dispatcher::with_policy(
            Script::new([ch('a'), ctrl('z'), ch('b'), ctrl('a'), ctrl('x')]),
            Recorder::default(),
            RedoPolicy::ClearOnEdit,
        );
        dispatcher.run().expect("run should not fail");
        // The 'b' insert cleared the redo stack, so Ctrl+A reports empty.
        assert_eq!(dispatcher.presenter().errors(), ["Redo Empty"]);
        assert_eq!(dispatcher.document().contents(), "b");
    }
}
