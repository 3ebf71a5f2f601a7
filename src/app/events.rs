//! Outbound diagnostics.
//!
//! The dispatcher and its tasks emit these through the
//! [`DiagnosticSink`](super::ports::DiagnosticSink) port.  [`render`] turns
//! each one into the exact console line; the serial adapter prints it.

use core::fmt::Write;

use crate::error::Error;

/// Longest rendered line.  Task names and error texts are short and static.
pub const LINE_CAP: usize = 96;

/// One rendered console line (no trailing newline).
pub type Line = heapless::String<LINE_CAP>;

/// User-visible events emitted by the firmware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    /// Printed once before the dispatch loop starts.
    Started,

    /// Temperature read by the temperature task.
    Temperature(f32),

    /// A task in the batch returned an error and was skipped.
    TaskFailed { task: &'static str, error: Error },
}

/// Format a diagnostic as its console line.
pub fn render(diagnostic: &Diagnostic) -> Line {
    let mut line = Line::new();
    // Overflow truncates the line; it never fails the caller.
    let _ = match diagnostic {
        Diagnostic::Started => line.write_str("Sistema iniciado."),
        Diagnostic::Temperature(celsius) => {
            write!(line, "Temperatura: {:.2} \u{00b0}C", celsius)
        }
        Diagnostic::TaskFailed { task, error } => {
            write!(line, "Erro na tarefa {}: {}", task, error)
        }
    };
    line
}
