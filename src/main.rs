// SPDX-License-Identifier: MIT
//
// quill — a tiny terminal text editor built around reversible edits.
//
// This is the main binary that wires together the two crates:
//
//   quill-term → terminal control, ANSI output, key parsing, blocking input
//   quill-edit → document, operations, undo/redo history, interaction loop
//
// The ScreenPresenter implements quill-edit's Presenter trait, so the
// dispatcher drives the screen without knowing anything about terminals.
// Each keypress flows through:
//
//   stdin → parser → classify → operation apply / undo / redo → refresh
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ error message line (red)     │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::io::{self, Write};
use std::process;

use quill_edit::dispatcher::{Dispatcher, Presenter};
use quill_edit::document::Document;
use quill_edit::history::RedoPolicy;
use quill_term::ansi;
use quill_term::keyboard::Keyboard;
use quill_term::terminal::{self, Size, Terminal};

use unicode_width::UnicodeWidthChar;

// ─── Presenter ──────────────────────────────────────────────────────────────

/// Full-repaint presenter.
///
/// Every refresh redraws the whole screen. At the sizes this editor deals
/// with that is well under a terminal frame, and it keeps the presenter
/// stateless apart from the pending error message.
struct ScreenPresenter {
    size: Size,
    error: Option<String>,
}

impl ScreenPresenter {
    fn new(size: Size) -> Self {
        Self { size, error: None }
    }

    /// Rows available for document text (everything above the status line).
    fn text_rows(&self) -> usize {
        usize::from(self.size.rows).saturating_sub(2)
    }

    /// Truncate a line to the screen width by display width.
    fn fit_line(&self, line: &str) -> String {
        let max = usize::from(self.size.cols);
        let mut width = 0;
        let mut out = String::new();
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if width + w > max {
                break;
            }
            width += w;
            out.push(ch);
        }
        out
    }

    fn draw_status(&self, w: &mut impl Write, doc: &Document) -> io::Result<()> {
        let row = self.size.rows.saturating_sub(2);
        ansi::cursor_to(w, 0, row)?;
        ansi::inverse(w)?;

        let status = format!(" quill  {} ", doc.cursor());
        let status = self.fit_line(&status);
        write!(w, "{status}")?;

        // Pad the rest of the row so the inverse band spans the screen.
        let used: usize = status.chars().map(|c| c.width().unwrap_or(0)).sum();
        for _ in used..usize::from(self.size.cols) {
            w.write_all(b" ")?;
        }

        ansi::reset(w)
    }

    fn draw_message(&self, w: &mut impl Write) -> io::Result<()> {
        let row = self.size.rows.saturating_sub(1);
        ansi::cursor_to(w, 0, row)?;
        ansi::clear_line(w)?;
        if let Some(ref msg) = self.error {
            ansi::fg_red(w)?;
            write!(w, "{}", self.fit_line(msg))?;
            ansi::reset(w)?;
        }
        Ok(())
    }

    /// Screen x of the cursor: the display width of the line up to the
    /// cursor column.
    fn cursor_x(doc: &Document) -> u16 {
        let cursor = doc.cursor();
        let width: usize = doc
            .line_text(cursor.line)
            .unwrap_or_default()
            .chars()
            .take(cursor.col)
            .map(|c| c.width().unwrap_or(0))
            .sum();
        u16::try_from(width).unwrap_or(u16::MAX)
    }
}

impl Presenter for ScreenPresenter {
    fn refresh(&mut self, doc: &Document) -> io::Result<()> {
        if let Some(size) = terminal::get_size() {
            self.size = size;
        }

        let stdout = io::stdout();
        let mut w = stdout.lock();

        ansi::cursor_hide(&mut w)?;
        ansi::clear_screen(&mut w)?;

        for row in 0..self.text_rows().min(doc.line_count()) {
            let text = doc.line_text(row).unwrap_or_default();
            ansi::cursor_to(&mut w, 0, u16::try_from(row).unwrap_or(u16::MAX))?;
            write!(w, "{}", self.fit_line(&text))?;
        }

        self.draw_status(&mut w, doc)?;
        self.draw_message(&mut w)?;

        let cursor = doc.cursor();
        let y = u16::try_from(cursor.line.min(self.text_rows().saturating_sub(1)))
            .unwrap_or(u16::MAX);
        ansi::cursor_to(&mut w, Self::cursor_x(doc), y)?;
        ansi::cursor_show(&mut w)?;
        w.flush()
    }

    fn show_error(&mut self, message: &str) -> io::Result<()> {
        self.error = Some(message.to_string());
        Ok(())
    }

    fn clear_error(&mut self) -> io::Result<()> {
        self.error = None;
        Ok(())
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn parse_policy() -> RedoPolicy {
    let mut policy = RedoPolicy::Preserve;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--clear-redo" => policy = RedoPolicy::ClearOnEdit,
            other => {
                eprintln!("quill: unknown argument: {other}");
                eprintln!("usage: quill [--clear-redo]");
                process::exit(2);
            }
        }
    }
    policy
}

fn run(policy: RedoPolicy) -> io::Result<()> {
    let mut term = Terminal::new()?;
    term.enter()?;

    let presenter = ScreenPresenter::new(term.size());
    let mut dispatcher = Dispatcher::with_policy(Keyboard::new(), presenter, policy);
    let result = dispatcher.run();

    term.leave()?;
    result
}

fn main() {
    let policy = parse_policy();

    if !terminal::is_tty() {
        eprintln!("quill: stdin is not a terminal");
        process::exit(1);
    }

    if let Err(err) = run(policy) {
        eprintln!("quill: {err}");
        process::exit(1);
    }
}
