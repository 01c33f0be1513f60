// SPDX-License-Identifier: MIT
//
// quill-term — Terminal backend for quill.
//
// Direct terminal control via ANSI escape sequences and raw termios:
// no TUI framework in between. The crate splits into four small
// modules: raw-mode management with guaranteed restore, escape
// sequence output, a byte-stream input parser, and a blocking
// keyboard that ties the last two together over stdin.

pub mod ansi;
pub mod input;
pub mod keyboard;
pub mod terminal;
