//! System configuration parameters
//!
//! All tunable timing and cadence parameters for the dispatcher.  There is
//! no persistent store; the firmware always boots with
//! [`DispatchConfig::default()`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;

/// Core dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    // --- Timing ---
    /// Tick timer period (milliseconds)
    pub tick_period_ms: u32,
    /// Main-loop sleep when no tick is pending (milliseconds)
    pub idle_poll_ms: u32,
    /// Delay before the first console line so a host listener can attach
    pub startup_delay_ms: u32,

    // --- Tasks ---
    /// ADC channel read by the temperature task
    pub temperature_channel: u8,
    /// NeoPixel strip placeholder cadence (every N ticks)
    pub neopixel_every: u32,
    /// OLED display placeholder cadence (every N ticks)
    pub oled_every: u32,

    // --- Diagnostics ---
    /// Log a dispatch summary every N batches (0 disables it)
    pub stats_interval_batches: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_period_ms: 100,   // 10 Hz
            idle_poll_ms: 1000,    // 1 Hz polling
            startup_delay_ms: 500, // serial attach

            // Tasks
            temperature_channel: pins::TEMP_ADC_CHANNEL,
            neopixel_every: 5,
            oled_every: 10,

            // Diagnostics
            stats_interval_batches: 60,
        }
    }
}

impl DispatchConfig {
    /// Reject values that would make the dispatcher spin or divide by zero.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be > 0"));
        }
        if self.idle_poll_ms == 0 {
            return Err(Error::Config("idle_poll_ms must be > 0"));
        }
        if self.neopixel_every == 0 || self.oled_every == 0 {
            return Err(Error::Config("task cadence must be > 0"));
        }
        if self.temperature_channel > pins::ADC1_MAX_CHANNEL {
            return Err(Error::Config("temperature_channel out of range"));
        }
        Ok(())
    }
}
