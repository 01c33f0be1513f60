// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Blocking keyboard — reads raw bytes from stdin and yields key events.
//
// The editor is single-threaded: it blocks on the next keypress, reacts,
// repaints, and blocks again. No background reader thread, no channels —
// `next_key()` simply does not return until a complete key event is
// available (or stdin hits EOF).
//
// The one subtlety is the ESC ambiguity: a bare ESC byte could be a
// standalone Escape keypress or the start of an escape sequence (arrow
// keys arrive as `ESC [ A`). While the parser has pending bytes, we
// `poll()` stdin with a short timeout instead of blocking; if no
// follow-up bytes arrive in time, the pending ESC is flushed as a real
// Escape key event.

use std::collections::VecDeque;
use std::io::{self, Read};

use crate::input::{KeyEvent, Parser};

/// Read buffer for one `read()` call. A single keypress is 1-6 bytes;
/// 1 KB absorbs fast key repeat without waste.
const READ_BUF_SIZE: usize = 1024;

/// How long to wait for escape sequence continuation bytes (milliseconds).
///
/// Terminals send multi-byte sequences back-to-back, so 10ms is plenty.
/// Anything longer makes the Escape key feel laggy.
const ESC_TIMEOUT_MS: i32 = 10;

/// Blocking keyboard over stdin.
///
/// Call [`next_key`](Self::next_key) to get the next key event. The call
/// blocks until a key is available.
///
/// # Example
///
/// ```no_run
/// use quill_term::keyboard::Keyboard;
///
/// let mut keyboard = Keyboard::new();
/// let key = keyboard.next_key()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Keyboard {
    /// Byte-stream parser with its own pending buffer.
    parser: Parser,
    /// Parsed events not yet handed to the caller. One `read()` can
    /// produce several events (fast typing, key repeat).
    queue: VecDeque<KeyEvent>,
}

impl Keyboard {
    /// Create a keyboard with an empty event queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            queue: VecDeque::new(),
        }
    }

    /// Block until the next key event is available and return it.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] when stdin is closed,
    /// or any underlying read error.
    pub fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(event);
            }

            // Pending bytes mean a possibly-unfinished escape sequence:
            // wait briefly for the rest, then flush ESC as a real key.
            if self.parser.has_pending() && !poll_stdin(ESC_TIMEOUT_MS)? {
                self.queue.extend(self.parser.flush());
                continue;
            }

            let mut buf = [0u8; READ_BUF_SIZE];
            let n = read_stdin(&mut buf)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stdin closed",
                ));
            }

            self.queue.extend(self.parser.advance(&buf[..n]));
        }
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stdin Primitives ───────────────────────────────────────────────────────

/// Wait up to `timeout_ms` for stdin to become readable.
///
/// Returns `Ok(true)` if data is available, `Ok(false)` on timeout.
#[cfg(unix)]
fn poll_stdin(timeout_ms: i32) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };

    let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };

    match ready {
        0 => Ok(false),
        n if n > 0 => Ok(true),
        _ => {
            let err = io::Error::last_os_error();
            // Interrupted by a signal — treat as timeout, caller retries.
            if err.kind() == io::ErrorKind::Interrupted {
                Ok(false)
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(not(unix))]
fn poll_stdin(_timeout_ms: i32) -> io::Result<bool> {
    // No poll available — pretend data is ready and let read() block.
    Ok(true)
}

/// Read available bytes from stdin. Blocks until at least one byte
/// arrives (raw mode uses VMIN=1, VTIME=0). Returns 0 on EOF.
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match io::stdin().lock().read(buf) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
