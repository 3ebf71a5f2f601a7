//! Port traits — the boundary between the dispatch core and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ tasks / Dispatcher (domain)
//! ```
//!
//! Driven adapters (ADC, GPIO, serial console) implement these traits.
//! Tasks receive them as `&mut dyn` through a
//! [`TaskContext`](crate::dispatcher::TaskContext), so the core never
//! touches registers directly and runs unchanged against mocks.

use crate::error::{OutputError, SensorError};
use crate::pins;

use super::events::Diagnostic;

// ───────────────────────────────────────────────────────────────
// Analog sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: a multiplexed 12-bit ADC.
pub trait AnalogPort {
    /// Route the converter to `channel` for subsequent reads.
    fn select_channel(&mut self, channel: u8) -> Result<(), SensorError>;

    /// Take one raw sample from the selected channel (nominally 0–4095).
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Digital output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The three named output channels of the RGB indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    Red,
    Green,
    Blue,
}

impl OutputChannel {
    /// All channels in R, G, B order.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Position in [`ALL`](Self::ALL).
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    /// Board GPIO wired to this channel.
    pub const fn gpio(self) -> i32 {
        match self {
            Self::Red => pins::LED_R_GPIO,
            Self::Green => pins::LED_G_GPIO,
            Self::Blue => pins::LED_B_GPIO,
        }
    }
}

/// Write-side port: named digital outputs.
pub trait OutputPort {
    /// Configure `channel` as a push-pull output.
    fn configure_output(&mut self, channel: OutputChannel) -> Result<(), OutputError>;

    /// Drive `channel` high (`true`) or low (`false`).
    fn set_level(&mut self, channel: OutputChannel, high: bool) -> Result<(), OutputError>;
}

// ───────────────────────────────────────────────────────────────
// Diagnostic sink port (driven adapter: domain → console)
// ───────────────────────────────────────────────────────────────

/// The domain emits user-visible [`Diagnostic`]s through this port.
/// Adapters decide where they go (USB-CDC console, test recorder, ...).
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: &Diagnostic);
}
