//! Shared tick state between the timer callback and the main loop.
//!
//! The timer callback is the only producer, the dispatcher the only
//! consumer.  State is one packed atomic word; no locks.
//!
//! ```text
//! ┌──────────────┐  fire()   ┌──────────────────────┐  take()   ┌──────────────┐
//! │ Timer ISR /  │──────────▶│ TickState            │──────────▶│ Dispatcher   │
//! │ timer task   │           │ counter · ready ·    │           │ (main loop)  │
//! └──────────────┘           │ coalesced            │           └──────────────┘
//!                            └──────────────────────┘
//!
//!  63            33  32  31                         0
//! ┌────────────────┬───┬────────────────────────────┐
//! │   coalesced    │ R │          counter           │
//! └────────────────┴───┴────────────────────────────┘
//! ```
//!
//! `ready` is a single-slot notification: firings that land while it is
//! already set do not queue up.  They advance `counter` and are tallied in
//! `coalesced`, which the consumer reads back with the snapshot.  All three
//! fields change in one read-modify-write, so a snapshot never mixes the
//! counter of one firing with the flag of another.

use core::sync::atomic::{AtomicU64, Ordering};

const COUNTER_MASK: u64 = 0xFFFF_FFFF;
const READY: u64 = 1 << 32;
const COALESCED_SHIFT: u32 = 33;
/// The tally saturates here rather than spilling into the other fields.
const COALESCED_MAX: u64 = (1 << (64 - COALESCED_SHIFT)) - 1;

/// Counter value observed by one batch, plus how many firings were folded
/// into it since the previous batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSnapshot {
    /// Tick counter at poll time.
    pub count: u32,
    /// Firings that hit an already-set flag since the last `take()`.
    pub coalesced: u32,
}

/// Tick counter, ready flag, and coalesced-firing tally.
///
/// Built with a `const fn` so it can live in a `static` and be handed out as
/// `&'static TickState` to both the timer registration and the dispatcher.
#[derive(Debug)]
pub struct TickState {
    word: AtomicU64,
}

impl Default for TickState {
    fn default() -> Self {
        Self::new()
    }
}

const fn counter_of(word: u64) -> u32 {
    (word & COUNTER_MASK) as u32
}

const fn coalesced_of(word: u64) -> u32 {
    (word >> COALESCED_SHIFT) as u32
}

/// Word after one firing: counter +1 (wrapping), flag set, tally bumped if
/// the flag was already set.
const fn fired(word: u64) -> u64 {
    let counter = counter_of(word).wrapping_add(1) as u64;
    let mut coalesced = word >> COALESCED_SHIFT;
    if word & READY != 0 && coalesced < COALESCED_MAX {
        coalesced += 1;
    }
    (coalesced << COALESCED_SHIFT) | READY | counter
}

impl TickState {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Start the counter at an arbitrary value.  Lets tests exercise
    /// wrap-around without firing four billion times.
    pub const fn starting_at(count: u32) -> Self {
        Self {
            word: AtomicU64::new(count as u64),
        }
    }

    /// Record one timer firing.
    ///
    /// Lock-free and non-blocking. Safe to call from ISR or esp_timer task
    /// context.
    pub fn fire(&self) {
        // The closure never declines, so this cannot fail.
        let _ = self
            .word
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |w| Some(fired(w)));
    }

    /// Consume the ready flag together with the counter and tally it
    /// guards.
    ///
    /// A firing that lands after this call sets the flag again for the next
    /// poll and carries its own counter value.  Returns `None` if no firing
    /// is pending.
    pub fn take(&self) -> Option<TickSnapshot> {
        let prev = self
            .word
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |w| {
                (w & READY != 0).then_some(w & COUNTER_MASK)
            })
            .ok()?;
        Some(TickSnapshot {
            count: counter_of(prev),
            coalesced: coalesced_of(prev),
        })
    }

    /// Current counter value (does not touch the flag).
    pub fn count(&self) -> u32 {
        counter_of(self.word.load(Ordering::Acquire))
    }

    /// Whether a firing is waiting to be consumed.
    pub fn is_ready(&self) -> bool {
        self.word.load(Ordering::Acquire) & READY != 0
    }
}
