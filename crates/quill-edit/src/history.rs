//! Undo/redo history — two stacks of operations.
//!
//! Every successfully applied [`Operation`] lands on the undo stack. Undo
//! pops it, reverses it, and moves it to the redo stack; redo re-applies
//! it and moves it back. Each operation lives on exactly one stack at a
//! time, which is what lets operations assume strict LIFO reversal.
//!
//! # Redo after new edits
//!
//! By default the redo stack is **preserved** when a new operation is
//! recorded, so a redo after fresh edits replays the old operation against
//! the new document state. [`RedoPolicy::ClearOnEdit`] gives the more
//! conventional behavior where any new edit discards the forward history.

use crate::document::Document;
use crate::operation::Operation;

/// What happens to the redo stack when a new operation is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedoPolicy {
    /// Keep redoable operations across new edits. A later redo replays
    /// them against whatever state the document is in by then.
    #[default]
    Preserve,
    /// Discard the redo stack whenever a new operation is recorded.
    ClearOnEdit,
}

/// Undo/redo history for a document.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Operation>,
    redo_stack: Vec<Operation>,
    policy: RedoPolicy,
}

impl History {
    /// Create an empty history with the given redo policy.
    #[must_use]
    pub const fn new(policy: RedoPolicy) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            policy,
        }
    }

    /// Record a successfully applied operation.
    ///
    /// The caller must have already applied it — the history never applies
    /// an operation on record.
    pub fn record(&mut self, op: Operation) {
        if self.policy == RedoPolicy::ClearOnEdit {
            self.redo_stack.clear();
        }
        self.undo_stack.push(op);
    }

    /// Undo the most recent operation. Returns `false` if there is nothing
    /// to undo.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        let Some(op) = self.undo_stack.pop() else {
            return false;
        };
        op.undo(doc);
        self.redo_stack.push(op);
        true
    }

    /// Redo the most recently undone operation. Returns `false` if there
    /// is nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(mut op) = self.redo_stack.pop() else {
            return false;
        };
        // An operation on the redo stack already applied cleanly once.
        // With the Preserve policy the document may have changed since, so
        // the replay can legitimately fail; the operation is dropped.
        if op.apply(doc).is_err() {
            return true;
        }
        self.undo_stack.push(op);
        true
    }

    /// True if there are operations that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there are operations that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of operations on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop both stacks. Called when the editing session ends.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(RedoPolicy::Preserve)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    /// Helper: apply an operation and record it.
    fn do_op(h: &mut History, doc: &mut Document, mut op: Operation) {
        op.apply(doc).expect("operation should apply");
        h.record(op);
    }

    // -- Basic undo/redo ----------------------------------------------------

    #[test]
    fn undo_single_insert() {
        let mut doc = Document::new();
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::insert_char('a'));
        assert_eq!(doc.contents(), "a");

        assert!(h.undo(&mut doc));
        assert_eq!(doc.contents(), "");
        assert_eq!(doc.cursor(), Position::ZERO);
    }

    #[test]
    fn redo_after_undo() {
        let mut doc = Document::new();
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::insert_char('a'));
        h.undo(&mut doc);
        assert_eq!(doc.contents(), "");

        assert!(h.redo(&mut doc));
        assert_eq!(doc.contents(), "a");
        assert_eq!(doc.cursor(), Position::new(0, 1));
    }

    #[test]
    fn undo_nothing_returns_false() {
        let mut doc = Document::new();
        let mut h = History::default();
        assert!(!h.undo(&mut doc));
    }

    #[test]
    fn redo_nothing_returns_false() {
        let mut doc = Document::new();
        let mut h = History::default();
        assert!(!h.redo(&mut doc));
    }

    // -- Stack discipline ---------------------------------------------------

    #[test]
    fn undo_is_lifo() {
        let mut doc = Document::new();
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::insert_char('a'));
        do_op(&mut h, &mut doc, Operation::insert_char('b'));
        assert_eq!(doc.contents(), "ab");

        h.undo(&mut doc);
        assert_eq!(doc.contents(), "a");

        h.undo(&mut doc);
        assert_eq!(doc.contents(), "");
    }

    #[test]
    fn undo_all_then_redo_all() {
        let mut doc = Document::new();
        let mut h = History::default();

        for ch in ['h', 'i', '!'] {
            do_op(&mut h, &mut doc, Operation::insert_char(ch));
        }
        assert_eq!(doc.contents(), "hi!");
        assert_eq!(h.undo_count(), 3);

        while h.undo(&mut doc) {}
        assert_eq!(doc.contents(), "");
        assert_eq!(h.redo_count(), 3);

        while h.redo(&mut doc) {}
        assert_eq!(doc.contents(), "hi!");
        assert_eq!(h.undo_count(), 3);
        assert_eq!(h.redo_count(), 0);
    }

    #[test]
    fn operation_moves_between_stacks() {
        let mut doc = Document::new();
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::insert_char('x'));
        assert_eq!((h.undo_count(), h.redo_count()), (1, 0));

        h.undo(&mut doc);
        assert_eq!((h.undo_count(), h.redo_count()), (0, 1));

        h.redo(&mut doc);
        assert_eq!((h.undo_count(), h.redo_count()), (1, 0));
    }

    #[test]
    fn undo_redo_undo_cycle() {
        let mut doc = Document::from_text("hello");
        doc.set_cursor(Position::new(0, 5));
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::backspace());
        assert_eq!(doc.contents(), "hell");

        h.undo(&mut doc);
        assert_eq!(doc.contents(), "hello");

        h.redo(&mut doc);
        assert_eq!(doc.contents(), "hell");

        h.undo(&mut doc);
        assert_eq!(doc.contents(), "hello");
    }

    // -- Redo policy --------------------------------------------------------

    #[test]
    fn preserve_policy_keeps_redo_across_edits() {
        let mut doc = Document::new();
        let mut h = History::new(RedoPolicy::Preserve);

        do_op(&mut h, &mut doc, Operation::insert_char('a'));
        h.undo(&mut doc);
        assert!(h.can_redo());

        do_op(&mut h, &mut doc, Operation::insert_char('b'));
        assert!(h.can_redo());

        // Redo replays the 'a' insert against the new state.
        h.redo(&mut doc);
        assert_eq!(doc.contents(), "ba");
    }

    #[test]
    fn clear_on_edit_policy_discards_redo() {
        let mut doc = Document::new();
        let mut h = History::new(RedoPolicy::ClearOnEdit);

        do_op(&mut h, &mut doc, Operation::insert_char('a'));
        h.undo(&mut doc);
        assert!(h.can_redo());

        do_op(&mut h, &mut doc, Operation::insert_char('b'));
        assert!(!h.can_redo());
        assert_eq!(doc.contents(), "b");
    }

    #[test]
    fn preserved_redo_that_fails_is_dropped() {
        let mut doc = Document::from_text("ab");
        doc.set_cursor(Position::new(0, 1));
        let mut h = History::new(RedoPolicy::Preserve);

        do_op(&mut h, &mut doc, Operation::cursor_left());
        h.undo(&mut doc);
        assert_eq!(doc.cursor(), Position::new(0, 1));
        assert!(h.can_redo());

        // Move the cursor to column 0, where cursor-left cannot apply.
        do_op(&mut h, &mut doc, Operation::cursor_home());
        assert_eq!(doc.cursor(), Position::ZERO);

        // Redo attempts the stale cursor-left, fails, and drops it.
        assert!(h.redo(&mut doc));
        assert!(!h.can_redo());
        assert_eq!(doc.cursor(), Position::ZERO);
    }

    // -- Movements in history -----------------------------------------------

    #[test]
    fn movements_are_undoable() {
        let mut doc = Document::from_text("first\nsecond");
        doc.set_cursor(Position::new(1, 3));
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::cursor_up());
        do_op(&mut h, &mut doc, Operation::cursor_home());
        assert_eq!(doc.cursor(), Position::new(0, 0));

        h.undo(&mut doc);
        assert_eq!(doc.cursor(), Position::new(0, 3));

        h.undo(&mut doc);
        assert_eq!(doc.cursor(), Position::new(1, 3));
    }

    // -- Clear --------------------------------------------------------------

    #[test]
    fn clear_drops_both_stacks() {
        let mut doc = Document::new();
        let mut h = History::default();

        do_op(&mut h, &mut doc, Operation::insert_char('a'));
        do_op(&mut h, &mut doc, Operation::insert_char('b'));
        h.undo(&mut doc);

        assert!(h.can_undo());
        assert!(h.can_redo());

        h.clear();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        // The document keeps whatever state it had.
        assert_eq!(doc.contents(), "a");
    }

    // -- Default ------------------------------------------------------------

    #[test]
    fn default_is_empty_with_preserve_policy() {
        let h = History::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }
}
