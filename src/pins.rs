//! GPIO / peripheral pin assignments for the board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// RGB indicator LED (three discrete channels, active HIGH)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 12;
pub const LED_G_GPIO: i32 = 13;
pub const LED_B_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Analog temperature input (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel carrying the temperature sensor voltage.
pub const TEMP_ADC_CHANNEL: u8 = 4;

/// Highest valid ADC1 channel index on the ESP32-S3.
pub const ADC1_MAX_CHANNEL: u8 = 9;
