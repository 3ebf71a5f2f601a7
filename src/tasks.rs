//! The firmware's batch: what runs on every observed tick, and in which
//! order.
//!
//! | # | Task        | Cadence          | Effect                           |
//! |---|-------------|------------------|----------------------------------|
//! | 1 | temperature | every tick       | read ADC, print `Temperatura: …` |
//! | 2 | rgb-cycle   | every tick       | light R/G/B for `count % 3`      |
//! | 3 | neopixel    | every 5th tick   | extension point (no effect)      |
//! | 4 | oled        | every 10th tick  | extension point (no effect)      |

use log::{debug, trace};

use crate::app::events::Diagnostic;
use crate::config::DispatchConfig;
use crate::dispatcher::{Cadence, Task, TaskContext, TaskTable, push_task};
use crate::drivers::rgb_led;
use crate::error::Result;
use crate::tick::TickSnapshot;

pub const TEMPERATURE: &str = "temperature";
pub const RGB_CYCLE: &str = "rgb-cycle";
pub const NEOPIXEL: &str = "neopixel";
pub const OLED: &str = "oled";

/// Build the ordered task table from configuration.
pub fn build_task_table(config: &DispatchConfig) -> Result<TaskTable> {
    let mut table = TaskTable::new();
    push_task(
        &mut table,
        Task {
            name: TEMPERATURE,
            cadence: Cadence::EveryTick,
            run: temperature_task,
        },
    )?;
    push_task(
        &mut table,
        Task {
            name: RGB_CYCLE,
            cadence: Cadence::EveryTick,
            run: rgb_cycle_task,
        },
    )?;
    push_task(
        &mut table,
        Task {
            name: NEOPIXEL,
            cadence: Cadence::every(config.neopixel_every)?,
            run: neopixel_task,
        },
    )?;
    push_task(
        &mut table,
        Task {
            name: OLED,
            cadence: Cadence::every(config.oled_every)?,
            run: oled_task,
        },
    )?;
    Ok(table)
}

fn temperature_task(ctx: &mut TaskContext<'_>, _tick: TickSnapshot) -> Result<()> {
    let reading = ctx.temperature.read(ctx.adc)?;
    debug!("temperature: raw={} -> {:.2}C", reading.raw, reading.celsius);
    ctx.sink.emit(&Diagnostic::Temperature(reading.celsius));
    Ok(())
}

fn rgb_cycle_task(ctx: &mut TaskContext<'_>, tick: TickSnapshot) -> Result<()> {
    let lit = rgb_led::set_state(ctx.outputs, tick.count)?;
    trace!("rgb-cycle: tick {} -> {:?}", tick.count, lit);
    Ok(())
}

// Addressable LED strip goes here.
fn neopixel_task(_ctx: &mut TaskContext<'_>, tick: TickSnapshot) -> Result<()> {
    trace!("neopixel: tick {}", tick.count);
    Ok(())
}

// OLED display refresh goes here.
fn oled_task(_ctx: &mut TaskContext<'_>, tick: TickSnapshot) -> Result<()> {
    trace!("oled: tick {}", tick.count);
    Ok(())
}
