//! Serial console diagnostic sink.
//!
//! Implements [`DiagnosticSink`] by printing each rendered line to stdout,
//! which ESP-IDF routes to the UART / USB-CDC console.  This is the
//! user-visible channel; `log` output is separate and filterable.

use std::io::Write;

use crate::app::events::{Diagnostic, render};
use crate::app::ports::DiagnosticSink;

/// Adapter that prints every [`Diagnostic`] on its own line.
pub struct SerialConsole<W: Write = std::io::Stdout> {
    out: W,
}

impl SerialConsole {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> SerialConsole<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticSink for SerialConsole<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let line = render(diagnostic);
        // Write failures only reach the log.
        if writeln!(self.out, "{}", line).and_then(|()| self.out.flush()).is_err() {
            log::warn!("console: write failed, dropped '{}'", line);
        }
    }
}
