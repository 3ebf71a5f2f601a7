//! ADC adapter — bridges the converter to [`AnalogPort`].
//!
//! - **`target_os = "espidf"`** — ADC1 through the ESP-IDF oneshot driver.
//!   Channels are configured lazily on first selection (12 dB attenuation,
//!   12-bit width, so 0–3.3 V spans 0–4095).
//! - **`not(target_os = "espidf")`** — [`SimAdc`] returns an injected raw
//!   sample for host runs and tests.

use crate::app::ports::AnalogPort;
use crate::error::SensorError;
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── ESP-IDF oneshot ADC ───────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct EspAdc {
    handle: adc_oneshot_unit_handle_t,
    /// Bit n set = channel n already configured.
    configured: u16,
    selected: Option<u8>,
}

#[cfg(target_os = "espidf")]
impl EspAdc {
    /// Create the ADC1 oneshot unit.
    pub fn new() -> Result<Self, SensorError> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: called once at boot; `handle` is owned by the returned adapter.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcInitFailed(ret));
        }
        info!("adc: ADC1 oneshot unit ready");
        Ok(Self {
            handle,
            configured: 0,
            selected: None,
        })
    }

    fn configure_channel(&mut self, channel: u8) -> Result<(), SensorError> {
        if self.configured & (1 << channel) != 0 {
            return Ok(());
        }
        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: `handle` is valid for the adapter's lifetime.
        let ret = unsafe { adc_oneshot_config_channel(self.handle, u32::from(channel), &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcInitFailed(ret));
        }
        self.configured |= 1 << channel;
        info!("adc: CH{} configured", channel);
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl AnalogPort for EspAdc {
    fn select_channel(&mut self, channel: u8) -> Result<(), SensorError> {
        if channel > pins::ADC1_MAX_CHANNEL {
            return Err(SensorError::InvalidChannel(channel));
        }
        self.configure_channel(channel)?;
        self.selected = Some(channel);
        Ok(())
    }

    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let channel = self.selected.ok_or(SensorError::NoChannelSelected)?;
        let mut raw: i32 = 0;
        // SAFETY: `handle` is valid and the channel was configured on selection.
        let ret = unsafe { adc_oneshot_read(self.handle, u32::from(channel), &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed(ret));
        }
        Ok(raw.max(0) as u16)
    }
}

#[cfg(target_os = "espidf")]
impl Drop for EspAdc {
    fn drop(&mut self) {
        // SAFETY: `handle` was created in `new()` and is released exactly once.
        unsafe {
            adc_oneshot_del_unit(self.handle);
        }
    }
}

// ── Simulated ADC ─────────────────────────────────────────────

/// Raw sample that converts to roughly 27 °C.
#[cfg(not(target_os = "espidf"))]
pub const SIM_ROOM_TEMP_RAW: u16 = 876;

/// Host-side ADC returning an injected sample.
#[cfg(not(target_os = "espidf"))]
pub struct SimAdc {
    raw: u16,
    selected: Option<u8>,
}

#[cfg(not(target_os = "espidf"))]
impl Default for SimAdc {
    fn default() -> Self {
        Self::new(SIM_ROOM_TEMP_RAW)
    }
}

#[cfg(not(target_os = "espidf"))]
impl SimAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw,
            selected: None,
        }
    }

    /// Inject the next sample.
    pub fn set_raw(&mut self, raw: u16) {
        self.raw = raw;
    }

    pub fn selected(&self) -> Option<u8> {
        self.selected
    }
}

#[cfg(not(target_os = "espidf"))]
impl AnalogPort for SimAdc {
    fn select_channel(&mut self, channel: u8) -> Result<(), SensorError> {
        if channel > pins::ADC1_MAX_CHANNEL {
            return Err(SensorError::InvalidChannel(channel));
        }
        self.selected = Some(channel);
        Ok(())
    }

    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.selected.ok_or(SensorError::NoChannelSelected)?;
        Ok(self.raw)
    }
}
