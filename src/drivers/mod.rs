//! Peripheral drivers: the tick timer and the RGB indicator.

pub mod hw_timer;
pub mod rgb_led;
