//! GPIO adapter — three `embedded-hal` output pins behind [`OutputPort`].
//!
//! Generic over [`OutputPin`], so the same adapter drives
//! `esp_idf_hal::gpio::PinDriver`s on target and [`SimPin`]s on host.
//! Pins arrive already in output mode; `configure_output` marks a channel
//! as usable and writes to unconfigured channels are refused.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::{OutputChannel, OutputPort};
use crate::error::OutputError;

pub struct PinOutputs<R, G, B> {
    red: R,
    green: G,
    blue: B,
    configured: [bool; 3],
}

impl<R, G, B> PinOutputs<R, G, B>
where
    R: OutputPin,
    G: OutputPin,
    B: OutputPin,
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            configured: [false; 3],
        }
    }

    /// Borrow the underlying pins (R, G, B).
    pub fn pins(&self) -> (&R, &G, &B) {
        (&self.red, &self.green, &self.blue)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), OutputError> {
    pin.set_state(PinState::from(high))
        .map_err(|_| OutputError::GpioWriteFailed)
}

impl<R, G, B> OutputPort for PinOutputs<R, G, B>
where
    R: OutputPin,
    G: OutputPin,
    B: OutputPin,
{
    fn configure_output(&mut self, channel: OutputChannel) -> Result<(), OutputError> {
        self.configured[channel.index()] = true;
        log::debug!("gpio: {:?} on GPIO{} configured", channel, channel.gpio());
        Ok(())
    }

    fn set_level(&mut self, channel: OutputChannel, high: bool) -> Result<(), OutputError> {
        if !self.configured[channel.index()] {
            return Err(OutputError::NotConfigured);
        }
        match channel {
            OutputChannel::Red => drive(&mut self.red, high),
            OutputChannel::Green => drive(&mut self.green, high),
            OutputChannel::Blue => drive(&mut self.blue, high),
        }
    }
}

// ── Simulated pin ─────────────────────────────────────────────

/// In-memory output pin for host runs and tests.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
    writes: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Number of level writes since construction.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

/// RGB outputs backed by [`SimPin`]s.
#[cfg(not(target_os = "espidf"))]
pub type SimOutputs = PinOutputs<SimPin, SimPin, SimPin>;

#[cfg(not(target_os = "espidf"))]
impl SimOutputs {
    pub fn sim() -> Self {
        Self::new(SimPin::new(), SimPin::new(), SimPin::new())
    }

    /// Current levels, R, G, B.
    pub fn levels(&self) -> [bool; 3] {
        let (r, g, b) = self.pins();
        [r.is_high(), g.is_high(), b.is_high()]
    }
}
