//! RGB indicator driver.
//!
//! Three discrete channels (R/G/B) on plain GPIOs.  The lit channel is a
//! pure function of the tick counter: `n % 3` selects R, G, B in turn, and
//! exactly one channel is high at any time.
//!
//! ## Dual-target design
//!
//! Levels are written through [`OutputPort`]: ESP-IDF pin drivers on target,
//! in-memory pins on host/test.

use crate::app::ports::{OutputChannel, OutputPort};
use crate::error::OutputError;

/// Channel lit for tick `n`.
pub const fn active_channel(n: u32) -> OutputChannel {
    match n % 3 {
        0 => OutputChannel::Red,
        1 => OutputChannel::Green,
        _ => OutputChannel::Blue,
    }
}

/// Levels for tick `n`, indexed R, G, B.  Exactly one entry is `true`.
pub const fn output_state(n: u32) -> [bool; 3] {
    match active_channel(n) {
        OutputChannel::Red => [true, false, false],
        OutputChannel::Green => [false, true, false],
        OutputChannel::Blue => [false, false, true],
    }
}

/// Configure all three channels as outputs and switch them off.
pub fn configure(out: &mut dyn OutputPort) -> Result<(), OutputError> {
    for ch in OutputChannel::ALL {
        out.configure_output(ch)?;
        out.set_level(ch, false)?;
    }
    Ok(())
}

/// Drive the channels for tick `n`.  Returns the channel left lit.
///
/// Idempotent: calling twice with the same `n` writes the same levels.
pub fn set_state(out: &mut dyn OutputPort, n: u32) -> Result<OutputChannel, OutputError> {
    let levels = output_state(n);
    for ch in OutputChannel::ALL {
        out.set_level(ch, levels[ch.index()])?;
    }
    Ok(active_channel(n))
}
