//! On-die temperature sensor read through the 12-bit ADC.
//!
//! The sensor output is a voltage with a negative slope: 0.706 V at 27 °C,
//! falling 1.721 mV per degree.  The ADC maps 0–3.3 V onto 0–4095.
//!
//! ## Dual-target design
//!
//! The read goes through [`AnalogPort`], so the same code runs against the
//! ESP-IDF oneshot ADC on target and the simulated ADC on host.

use crate::app::ports::AnalogPort;
use crate::error::SensorError;

const V_REF: f32 = 3.3;
/// 12-bit converter: volts per count is `V_REF / 4096`.
const ADC_STEPS: f32 = 4096.0;
/// Largest sample a 12-bit converter can produce.
pub const ADC_MAX_RAW: u16 = 4095;

const T_REF_C: f32 = 27.0;
const V_AT_T_REF: f32 = 0.706;
const SLOPE_V_PER_C: f32 = 0.001_721;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
}

/// Convert a raw 12-bit sample to volts.
pub fn raw_to_volts(raw: u16) -> f32 {
    raw as f32 * V_REF / ADC_STEPS
}

/// Convert a sensor voltage to degrees Celsius.
pub fn volts_to_celsius(voltage: f32) -> f32 {
    T_REF_C - (voltage - V_AT_T_REF) / SLOPE_V_PER_C
}

/// Convert a raw 12-bit sample to degrees Celsius.
pub fn raw_to_celsius(raw: u16) -> f32 {
    volts_to_celsius(raw_to_volts(raw))
}

pub struct TemperatureSensor {
    channel: u8,
}

impl TemperatureSensor {
    pub fn new(channel: u8) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Select the sensor channel, sample it, and convert.
    ///
    /// Samples above [`ADC_MAX_RAW`] cannot come from a healthy 12-bit
    /// converter and are rejected rather than converted.
    pub fn read(&self, adc: &mut dyn AnalogPort) -> Result<TemperatureReading, SensorError> {
        adc.select_channel(self.channel)?;
        let raw = adc.read_raw()?;
        if raw > ADC_MAX_RAW {
            return Err(SensorError::OutOfRange(raw));
        }
        Ok(TemperatureReading {
            raw,
            celsius: raw_to_celsius(raw),
        })
    }
}
