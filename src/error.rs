//! Unified error types for the tempociclo firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! dispatcher can report any task failure the same way.  All variants are
//! `Copy` so they can be handed to the diagnostic sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The analog sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// A digital output could not be configured or driven.
    Output(OutputError),
    /// The periodic tick timer could not be armed.
    Timer(TimerError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Output(e) => write!(f, "output: {e}"),
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The ADC unit or channel could not be initialised (ESP-IDF return code).
    AdcInitFailed(i32),
    /// The ADC driver reported a failure (ESP-IDF return code).
    AdcReadFailed(i32),
    /// A read was requested before any channel was selected.
    NoChannelSelected,
    /// The requested channel does not exist on this ADC unit.
    InvalidChannel(u8),
    /// The sample does not fit the 12-bit converter range.
    OutOfRange(u16),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC init failed (rc={rc})"),
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
            Self::NoChannelSelected => write!(f, "no ADC channel selected"),
            Self::InvalidChannel(ch) => write!(f, "invalid ADC channel {ch}"),
            Self::OutOfRange(raw) => write!(f, "sample {raw} out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// The channel was driven before `configure_output` was called for it.
    NotConfigured,
    /// GPIO level write failed.
    GpioWriteFailed,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "channel not configured"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// A zero period would fire continuously.
    InvalidPeriod,
    /// `esp_timer_create` failed.
    Create(i32),
    /// `esp_timer_start_periodic` failed.
    Start(i32),
    /// The host simulation thread could not be spawned.
    Spawn,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPeriod => write!(f, "period must be non-zero"),
            Self::Create(rc) => write!(f, "timer create failed (rc={rc})"),
            Self::Start(rc) => write!(f, "timer start failed (rc={rc})"),
            Self::Spawn => write!(f, "tick thread spawn failed"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
