//! Sensor subsystem.
//!
//! Only the ADC temperature sensor exists today; drivers here are pure
//! conversions over the [`AnalogPort`](crate::app::ports::AnalogPort).

pub mod temperature;
