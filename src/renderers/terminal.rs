//! Plain-text view for terminals.
//!
//! Writes to any [`io::Write`]. A write failure is logged and otherwise
//! ignored; a broken pipe must not interrupt the run.

use std::fmt::Display;
use std::io::{self, Write};

use super::{LineHighlighter, Notice, Notifier, Renderer};
use crate::script::Script;

/// Terminal renderer, highlighter and notifier in one.
#[derive(Debug)]
pub struct TerminalView<O: Write> {
    out: O,
    lines: Vec<String>,
    show_board: bool,
}

impl TerminalView<io::Stdout> {
    /// View on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<O: Write> TerminalView<O> {
    /// Create a view writing to `out`.
    pub const fn new(out: O) -> Self {
        Self {
            out,
            lines: Vec::new(),
            show_board: true,
        }
    }

    /// Remember script text so highlights can echo the source line.
    pub fn load_script(&mut self, script: &Script) {
        self.lines = script
            .lines()
            .iter()
            .map(|l| l.source().to_string())
            .collect();
    }

    /// Print only line traces and notices, no board.
    #[must_use]
    pub fn without_board(mut self) -> Self {
        self.show_board = false;
        self
    }

    /// Give back the writer.
    pub fn into_inner(self) -> O {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            log::warn!("terminal write failed: {e}");
        }
    }
}

impl<W: Display, O: Write> Renderer<W> for TerminalView<O> {
    fn render(&mut self, world: &W) {
        if self.show_board {
            let text = world.to_string();
            self.emit(&text);
        }
    }
}

impl<O: Write> LineHighlighter for TerminalView<O> {
    fn set_active(&mut self, line: usize, active: bool) {
        if !active {
            return;
        }
        let source = self.lines.get(line).map_or("", String::as_str).to_string();
        self.emit(&format!("▶ {:>3} │ {source}", line + 1));
    }

    fn mark_failed(&mut self, line: usize) {
        self.emit(&format!("✗ {:>3} │ line failed", line + 1));
    }
}

impl<O: Write> Notifier for TerminalView<O> {
    fn notify(&mut self, notice: &Notice) {
        let text = notice.message().to_string();
        self.emit(&format!("! {text}"));
    }
}
