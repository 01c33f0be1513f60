//! # quill-edit — Editor core for quill
//!
//! This crate contains the fundamental building blocks of the editor:
//!
//! - **[`position`]** — `Position` (line, col) type, 0-indexed
//! - **[`document`]** — `Document` wrapping a rope plus the cursor
//! - **[`error`]** — recoverable editing errors with user-facing messages
//! - **[`operation`]** — reversible edit and movement operations
//! - **[`history`]** — two-stack undo/redo over operations
//! - **[`keymap`]** — key events classified into interactions
//! - **[`dispatcher`]** — the blocking interaction loop tying it together
//!
//! The flow is linear: a key event comes in, the keymap classifies it as an
//! interaction (apply an operation, undo, redo, or quit), the dispatcher
//! routes it, and the presenter repaints. Every applied operation lands on
//! the undo stack and knows how to reverse itself.

pub mod dispatcher;
pub mod document;
pub mod error;
pub mod history;
pub mod keymap;
pub mod operation;
pub mod position;
