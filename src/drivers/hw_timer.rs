//! Periodic tick timer.
//!
//! On ESP-IDF this is an `esp_timer` whose callback calls
//! [`TickState::fire`].  The `&'static TickState` itself is the callback
//! argument, so no `static mut` handle juggling is needed.
//! On simulation targets a background thread fires at a fixed rate.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR); `fire()`
//! is three atomic ops and never blocks.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::error::TimerError;
use crate::tick::TickState;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use std::sync::Arc;
#[cfg(not(target_os = "espidf"))]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(not(target_os = "espidf"))]
use std::time::{Duration, Instant};

/// Lifecycle of a [`PeriodicTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Registered and firing on schedule.
    Armed,
    /// Deregistered; no further firings.
    Stopped,
}

/// A running periodic timer bound to one [`TickState`].
///
/// Dropping the timer stops it.
pub struct PeriodicTimer {
    period_ms: u32,
    state: TimerState,
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    #[cfg(not(target_os = "espidf"))]
    running: Arc<AtomicBool>,
    #[cfg(not(target_os = "espidf"))]
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static TickState` handed to `start()`.
    let ticks = unsafe { &*(arg as *const TickState) };
    ticks.fire();
}

/// First deadline on the `period` grid after `now`.  Skips grid points
/// already in the past instead of firing them back to back.
#[cfg(not(target_os = "espidf"))]
fn next_deadline(deadline: Instant, now: Instant, period: Duration) -> Instant {
    let mut next = deadline + period;
    if next <= now {
        let behind = (now - next).as_nanos() / period.as_nanos();
        next += period * (behind as u32 + 1);
    }
    next
}

impl PeriodicTimer {
    /// Arm a timer that fires `ticks` every `period_ms` milliseconds.
    #[cfg(target_os = "espidf")]
    pub fn start(period_ms: u32, ticks: &'static TickState) -> Result<Self, TimerError> {
        if period_ms == 0 {
            return Err(TimerError::InvalidPeriod);
        }

        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::from_ref(ticks).cast_mut().cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            // Periods missed during light sleep collapse into one callback,
            // the same way the ready flag collapses them.
            skip_unhandled_events: true,
        };

        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: `args` is fully initialised and `ticks` outlives the timer.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(TimerError::Create(ret));
        }

        // SAFETY: `handle` was just created above.
        let ret = unsafe { esp_timer_start_periodic(handle, u64::from(period_ms) * 1_000) };
        if ret != ESP_OK as i32 {
            // SAFETY: timer is created but not running.
            unsafe { esp_timer_delete(handle) };
            return Err(TimerError::Start(ret));
        }

        info!("hw_timer: tick@{}ms armed", period_ms);
        Ok(Self {
            period_ms,
            state: TimerState::Armed,
            handle,
        })
    }

    /// Arm a simulated timer thread that fires `ticks` every `period_ms`.
    ///
    /// Deadlines advance by a fixed step, so a slow wake-up does not drift
    /// the schedule.  Periods missed by a late wake-up collapse into one
    /// firing, matching `skip_unhandled_events` on target.
    #[cfg(not(target_os = "espidf"))]
    pub fn start(period_ms: u32, ticks: &'static TickState) -> Result<Self, TimerError> {
        if period_ms == 0 {
            return Err(TimerError::InvalidPeriod);
        }

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let period = Duration::from_millis(u64::from(period_ms));

        let thread = std::thread::Builder::new()
            .name("tick".into())
            .spawn(move || {
                let mut deadline = Instant::now() + period;
                while flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < deadline {
                        std::thread::park_timeout(deadline - now);
                        continue;
                    }
                    ticks.fire();
                    deadline = next_deadline(deadline, now, period);
                }
            })
            .map_err(|_| TimerError::Spawn)?;

        info!("hw_timer(sim): tick@{}ms armed", period_ms);
        Ok(Self {
            period_ms,
            state: TimerState::Armed,
            running,
            thread: Some(thread),
        })
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Deregister the timer.  No firing happens after this returns.
    #[cfg(target_os = "espidf")]
    pub fn stop(&mut self) {
        if self.state == TimerState::Stopped {
            return;
        }
        // SAFETY: `handle` is valid while Armed; deleted exactly once here.
        let (stop_rc, delete_rc) =
            unsafe { (esp_timer_stop(self.handle), esp_timer_delete(self.handle)) };
        // ESP_ERR_INVALID_STATE from stop just means the timer was not running.
        if stop_rc != ESP_OK as i32 && stop_rc != ESP_ERR_INVALID_STATE as i32 {
            warn!("hw_timer: esp_timer_stop failed (rc={})", stop_rc);
        }
        if delete_rc != ESP_OK as i32 {
            warn!("hw_timer: esp_timer_delete failed (rc={})", delete_rc);
        }
        self.handle = core::ptr::null_mut();
        self.state = TimerState::Stopped;
        info!("hw_timer: stopped");
    }

    /// Stop and join the simulation thread.
    #[cfg(not(target_os = "espidf"))]
    pub fn stop(&mut self) {
        if self.state == TimerState::Stopped {
            return;
        }
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            let _ = thread.join();
        }
        self.state = TimerState::Stopped;
        info!("hw_timer(sim): stopped");
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
