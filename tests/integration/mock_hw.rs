//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real ADC/GPIO registers.

use tempociclo::app::events::{Diagnostic, render};
use tempociclo::app::ports::{AnalogPort, DiagnosticSink, OutputChannel, OutputPort};
use tempociclo::error::{OutputError, SensorError};
use tempociclo::tick::TickState;

// ── MockAdc ───────────────────────────────────────────────────

/// ADC returning queued samples; repeats the last one when the queue runs dry.
pub struct MockAdc {
    samples: Vec<Result<u16, SensorError>>,
    last: Result<u16, SensorError>,
    pub selects: Vec<u8>,
    /// Simulates a timer firing in the middle of a batch.
    pub fire_on_read: Option<&'static TickState>,
}

#[allow(dead_code)]
impl MockAdc {
    pub fn constant(raw: u16) -> Self {
        Self {
            samples: Vec::new(),
            last: Ok(raw),
            selects: Vec::new(),
            fire_on_read: None,
        }
    }

    /// Samples are returned in the given order.
    pub fn sequence(samples: &[Result<u16, SensorError>]) -> Self {
        let mut samples = samples.to_vec();
        samples.reverse();
        Self {
            samples,
            last: Ok(0),
            selects: Vec::new(),
            fire_on_read: None,
        }
    }
}

impl AnalogPort for MockAdc {
    fn select_channel(&mut self, channel: u8) -> Result<(), SensorError> {
        self.selects.push(channel);
        Ok(())
    }

    fn read_raw(&mut self) -> Result<u16, SensorError> {
        if let Some(ticks) = self.fire_on_read {
            ticks.fire();
        }
        if let Some(next) = self.samples.pop() {
            self.last = next;
        }
        self.last
    }
}

// ── MockOutputs ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Configure(OutputChannel),
    Set(OutputChannel, bool),
}

#[derive(Default)]
pub struct MockOutputs {
    pub calls: Vec<OutputCall>,
    levels: [bool; 3],
    /// Fail every `set_level` while true.
    pub broken: bool,
}

#[allow(dead_code)]
impl MockOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> [bool; 3] {
        self.levels
    }

    /// The single lit channel, if exactly one is high.
    pub fn lit(&self) -> Option<OutputChannel> {
        let high: Vec<OutputChannel> = OutputChannel::ALL
            .into_iter()
            .filter(|ch| self.levels[ch.index()])
            .collect();
        match high.as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }
}

impl OutputPort for MockOutputs {
    fn configure_output(&mut self, channel: OutputChannel) -> Result<(), OutputError> {
        self.calls.push(OutputCall::Configure(channel));
        Ok(())
    }

    fn set_level(&mut self, channel: OutputChannel, high: bool) -> Result<(), OutputError> {
        if self.broken {
            return Err(OutputError::GpioWriteFailed);
        }
        self.calls.push(OutputCall::Set(channel, high));
        self.levels[channel.index()] = high;
        Ok(())
    }
}

// ── RecordingConsole ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingConsole {
    pub diagnostics: Vec<Diagnostic>,
}

#[allow(dead_code)]
impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered console lines, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| render(d).as_str().to_owned())
            .collect()
    }
}

impl DiagnosticSink for RecordingConsole {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(*diagnostic);
    }
}
