//! Tempociclo firmware — main entry point.
//!
//! A periodic timer marks ticks; the main loop polls for them and runs a
//! fixed batch of tasks per observed tick.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspAdc / SimAdc   PinOutputs      SerialConsole   SystemDelay │
//! │  (AnalogPort)      (OutputPort)    (DiagnosticSink) (DelayNs)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  PeriodicTimer ──fire()──▶ TickState ──take()──▶ Dispatcher    │
//! │                                                   │            │
//! │                         temperature · rgb-cycle · neopixel · oled
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Startup failures are fatal; task failures inside the loop are reported
//! and skipped.

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{error, info};

use tempociclo::adapters::console::SerialConsole;
use tempociclo::adapters::time::SystemDelay;
use tempociclo::app::events::Diagnostic;
use tempociclo::app::ports::{AnalogPort, DiagnosticSink, OutputPort};
use tempociclo::config::DispatchConfig;
use tempociclo::dispatcher::{Dispatcher, TaskContext};
use tempociclo::drivers::hw_timer::PeriodicTimer;
use tempociclo::drivers::rgb_led;
use tempociclo::error::Error;
use tempociclo::sensors::temperature::TemperatureSensor;
use tempociclo::tasks;
use tempociclo::tick::TickState;

/// Shared between the timer callback and the dispatch loop.
static TICKS: TickState = TickState::new();

// ── Platform bring-up ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    Ok(())
}

#[cfg(target_os = "espidf")]
fn board() -> Result<(impl AnalogPort, impl OutputPort)> {
    use esp_idf_hal::gpio::PinDriver;
    use esp_idf_hal::peripherals::Peripherals;
    use tempociclo::adapters::gpio::PinOutputs;
    use tempociclo::adapters::hardware::EspAdc;

    let p = Peripherals::take()?;
    let adc = EspAdc::new().map_err(Error::from)?;
    // GPIO12/13/14, must match `pins::LED_*_GPIO`.
    let outputs = PinOutputs::new(
        PinDriver::output(p.pins.gpio12)?,
        PinDriver::output(p.pins.gpio13)?,
        PinDriver::output(p.pins.gpio14)?,
    );
    Ok((adc, outputs))
}

#[cfg(not(target_os = "espidf"))]
fn board() -> Result<(impl AnalogPort, impl OutputPort)> {
    use tempociclo::adapters::gpio::SimOutputs;
    use tempociclo::adapters::hardware::SimAdc;

    info!("board(sim): simulated ADC and RGB pins");
    Ok((SimAdc::default(), SimOutputs::sim()))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;
    info!("tempociclo v{}", env!("CARGO_PKG_VERSION"));

    let config = DispatchConfig::default();
    config
        .validate()
        .inspect_err(|e| error!("Invalid config: {}, halting", e))?;

    let mut delay = SystemDelay::new();
    let mut console = SerialConsole::new();

    // ── 2. Wait for the serial listener, announce ─────────────
    delay.delay_ms(config.startup_delay_ms);
    console.emit(&Diagnostic::Started);

    // ── 3. Peripherals (fail fast) ────────────────────────────
    let (mut adc, mut outputs) =
        board().inspect_err(|e| error!("Board init failed: {:#}, halting", e))?;

    let sensor = TemperatureSensor::new(config.temperature_channel);
    let probe = sensor
        .read(&mut adc)
        .map_err(Error::from)
        .inspect_err(|e| error!("Temperature sensor unavailable: {}, halting", e))?;
    info!("Temperature probe on CH{}: raw={}", sensor.channel(), probe.raw);

    rgb_led::configure(&mut outputs)
        .map_err(Error::from)
        .inspect_err(|e| error!("RGB outputs unavailable: {}, halting", e))?;

    // ── 4. Dispatcher + tick timer ────────────────────────────
    let table = tasks::build_task_table(&config)?;
    let mut dispatcher = Dispatcher::new(table, &config);

    let _timer = PeriodicTimer::start(config.tick_period_ms, &TICKS)
        .map_err(Error::from)
        .inspect_err(|e| error!("Tick timer failed: {}, halting", e))?;

    let mut ctx = TaskContext {
        adc: &mut adc,
        outputs: &mut outputs,
        sink: &mut console,
        temperature: sensor,
    };

    // ── 5. Dispatch loop ──────────────────────────────────────
    info!("System ready. Entering dispatch loop.");
    dispatcher.run(&TICKS, &mut ctx, &mut delay)
}
