//! Cooperative task dispatcher — the main loop.
//!
//! Polls the shared [`TickState`].  When a tick is pending it runs the
//! whole task table once, in order, against a single [`TickSnapshot`];
//! otherwise it sleeps for the idle interval and polls again.
//!
//! ```text
//!        ┌──────────────────────────────────────────────┐
//!        │                 step()                       │
//!        │                                              │
//!        │  TickState::take() ── None ──▶ delay_ms(idle)│
//!        │        │                                     │
//!        │      Some(snapshot)                          │
//!        │        ▼                                     │
//!        │  for task in table (fixed order):            │
//!        │     cadence due? ── no ──▶ skip              │
//!        │        │ yes                                 │
//!        │        ▼                                     │
//!        │     (task.run)(ctx, snapshot)                │
//!        │        └─ Err ──▶ warn! + DiagnosticSink     │
//!        └──────────────────────────────────────────────┘
//! ```
//!
//! Tasks are plain function pointers paired with a [`Cadence`], so adding a
//! task is a table entry, not a new branch in the loop.

use core::num::NonZeroU32;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::app::events::Diagnostic;
use crate::app::ports::{AnalogPort, DiagnosticSink, OutputPort};
use crate::config::DispatchConfig;
use crate::error::{Error, Result};
use crate::sensors::temperature::TemperatureSensor;
use crate::tick::{TickSnapshot, TickState};

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// Maximum number of tasks in one batch (stack-allocated table).
pub const MAX_TASKS: usize = 8;

/// When a task runs, as a predicate over the tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Every batch.
    EveryTick,
    /// Batches whose tick count is a multiple of K (including 0).
    Every(NonZeroU32),
}

impl Cadence {
    /// `Every(k)`, rejecting `k == 0`.
    pub fn every(k: u32) -> Result<Self> {
        NonZeroU32::new(k)
            .map(Self::Every)
            .ok_or(Error::Config("cadence must be > 0"))
    }

    pub fn is_due(self, count: u32) -> bool {
        match self {
            Self::EveryTick => true,
            Self::Every(k) => count % k.get() == 0,
        }
    }
}

/// Everything a task may touch while it runs.
pub struct TaskContext<'a> {
    pub adc: &'a mut dyn AnalogPort,
    pub outputs: &'a mut dyn OutputPort,
    pub sink: &'a mut dyn DiagnosticSink,
    pub temperature: TemperatureSensor,
}

/// Task body.  Receives the batch's counter snapshot; never mutates it.
pub type TaskFn = fn(&mut TaskContext<'_>, TickSnapshot) -> Result<()>;

/// A named, stateless unit of work.
#[derive(Clone, Copy)]
pub struct Task {
    pub name: &'static str,
    pub cadence: Cadence,
    pub run: TaskFn,
}

impl core::fmt::Debug for Task {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("cadence", &self.cadence)
            .finish_non_exhaustive()
    }
}

/// Ordered task table.
pub type TaskTable = heapless::Vec<Task, MAX_TASKS>;

/// Append `task` to `table`, failing if the table is full.
pub fn push_task(table: &mut TaskTable, task: Task) -> Result<()> {
    table
        .push(task)
        .map_err(|_| Error::Config("task table full"))
}

// ═══════════════════════════════════════════════════════════════
//  Reports
// ═══════════════════════════════════════════════════════════════

/// Outcome of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub tick: u32,
    /// Firings folded into this batch beyond the one that set the flag.
    pub coalesced: u32,
    pub ran: u8,
    pub skipped: u8,
    pub failed: u8,
}

/// Running totals since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub batches: u64,
    pub coalesced_ticks: u64,
    pub tasks_run: u64,
    pub task_failures: u64,
    pub last_tick: u32,
    /// `DISPATCH |` summary lines logged so far.
    pub summaries: u64,
}

// ═══════════════════════════════════════════════════════════════
//  Dispatcher
// ═══════════════════════════════════════════════════════════════

pub struct Dispatcher {
    tasks: TaskTable,
    idle_poll_ms: u32,
    stats_interval_batches: u32,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(tasks: TaskTable, config: &DispatchConfig) -> Self {
        info!(
            "Dispatcher: {} task(s), idle poll {}ms",
            tasks.len(),
            config.idle_poll_ms
        );
        Self {
            tasks,
            idle_poll_ms: config.idle_poll_ms,
            stats_interval_batches: config.stats_interval_batches,
            stats: DispatchStats::default(),
        }
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Run every due task once, in table order, against `tick`.
    ///
    /// A failing task is logged and reported through the sink; the rest of
    /// the batch still runs.
    pub fn run_batch(&mut self, tick: TickSnapshot, ctx: &mut TaskContext<'_>) -> BatchReport {
        let mut report = BatchReport {
            tick: tick.count,
            coalesced: tick.coalesced,
            ran: 0,
            skipped: 0,
            failed: 0,
        };

        for task in &self.tasks {
            if !task.cadence.is_due(tick.count) {
                report.skipped += 1;
                continue;
            }
            report.ran += 1;
            if let Err(error) = (task.run)(ctx, tick) {
                report.failed += 1;
                warn!(
                    "Dispatcher: task '{}' failed at tick {}: {}",
                    task.name, tick.count, error
                );
                ctx.sink.emit(&Diagnostic::TaskFailed {
                    task: task.name,
                    error,
                });
            }
        }

        self.record(&report);
        report
    }

    /// Consume a pending tick, if any, and run the batch for it.
    pub fn poll(&mut self, ticks: &TickState, ctx: &mut TaskContext<'_>) -> Option<BatchReport> {
        let snapshot = ticks.take()?;
        if snapshot.coalesced > 0 {
            debug!(
                "Dispatcher: tick {} coalesced {} earlier firing(s)",
                snapshot.count, snapshot.coalesced
            );
        }
        Some(self.run_batch(snapshot, ctx))
    }

    /// One main-loop iteration: poll, or sleep the idle interval if nothing
    /// was pending.
    pub fn step(
        &mut self,
        ticks: &TickState,
        ctx: &mut TaskContext<'_>,
        delay: &mut impl DelayNs,
    ) -> Option<BatchReport> {
        let report = self.poll(ticks, ctx);
        if report.is_none() {
            delay.delay_ms(self.idle_poll_ms);
        }
        report
    }

    /// The main loop.  Never returns; task failures do not end it.
    pub fn run(
        &mut self,
        ticks: &TickState,
        ctx: &mut TaskContext<'_>,
        delay: &mut impl DelayNs,
    ) -> ! {
        info!("Dispatcher: entering main loop");
        loop {
            self.step(ticks, ctx, delay);
        }
    }

    fn record(&mut self, report: &BatchReport) {
        let stats = &mut self.stats;
        stats.batches += 1;
        stats.coalesced_ticks += u64::from(report.coalesced);
        stats.tasks_run += u64::from(report.ran);
        stats.task_failures += u64::from(report.failed);
        stats.last_tick = report.tick;

        debug!(
            "Dispatcher: batch tick={} ran={} skipped={} failed={}",
            report.tick, report.ran, report.skipped, report.failed
        );

        if self.stats_interval_batches > 0
            && stats.batches % u64::from(self.stats_interval_batches) == 0
        {
            stats.summaries += 1;
            info!(
                "DISPATCH | batches={} | last_tick={} | coalesced={} | tasks_run={} | failures={}",
                stats.batches,
                stats.last_tick,
                stats.coalesced_ticks,
                stats.tasks_run,
                stats.task_failures,
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
