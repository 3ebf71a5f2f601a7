//! Blocking delay adapter.
//!
//! Implements [`DelayNs`] for the main loop's idle sleep and the startup
//! delay.
//!
//! - **`target_os = "espidf"`** — delegates to `esp_idf_hal::delay::FreeRtos`
//!   so the task yields to the scheduler while sleeping.
//! - **`not(target_os = "espidf")`** — uses `std::thread::sleep` for
//!   host-side simulation.

use embedded_hal::delay::DelayNs;

/// System delay for the current platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl SystemDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
