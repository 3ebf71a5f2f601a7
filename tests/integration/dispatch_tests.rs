//! Integration tests: TickState → Dispatcher → firmware task table → ports.

use tempociclo::app::events::Diagnostic;
use tempociclo::app::ports::OutputChannel;
use tempociclo::config::DispatchConfig;
use tempociclo::dispatcher::{BatchReport, Dispatcher, TaskContext};
use tempociclo::error::{Error, OutputError, SensorError};
use tempociclo::sensors::temperature::TemperatureSensor;
use tempociclo::tasks::{self, RGB_CYCLE, TEMPERATURE};
use tempociclo::tick::{TickSnapshot, TickState};

use super::mock_hw::{MockAdc, MockOutputs, OutputCall, RecordingConsole};

// ── Harness ───────────────────────────────────────────────────

struct Harness {
    adc: MockAdc,
    outputs: MockOutputs,
    console: RecordingConsole,
    dispatcher: Dispatcher,
}

impl Harness {
    fn new(adc: MockAdc) -> Self {
        let config = DispatchConfig::default();
        let table = tasks::build_task_table(&config).unwrap();
        Self {
            adc,
            outputs: MockOutputs::new(),
            console: RecordingConsole::new(),
            dispatcher: Dispatcher::new(table, &config),
        }
    }

    fn poll(&mut self, ticks: &TickState) -> Option<BatchReport> {
        let mut ctx = TaskContext {
            adc: &mut self.adc,
            outputs: &mut self.outputs,
            sink: &mut self.console,
            temperature: TemperatureSensor::new(4),
        };
        self.dispatcher.poll(ticks, &mut ctx)
    }

    fn batch(&mut self, count: u32) -> BatchReport {
        let mut ctx = TaskContext {
            adc: &mut self.adc,
            outputs: &mut self.outputs,
            sink: &mut self.console,
            temperature: TemperatureSensor::new(4),
        };
        self.dispatcher
            .run_batch(TickSnapshot { count, coalesced: 0 }, &mut ctx)
    }
}

// ── RGB cycle ─────────────────────────────────────────────────

#[test]
fn three_batches_from_zero_light_r_g_b() {
    let mut h = Harness::new(MockAdc::constant(876));
    let mut seen = Vec::new();
    for n in 0..3 {
        h.batch(n);
        seen.push(h.outputs.lit());
    }
    assert_eq!(
        seen,
        vec![
            Some(OutputChannel::Red),
            Some(OutputChannel::Green),
            Some(OutputChannel::Blue)
        ]
    );
}

#[test]
fn timer_driven_cycle_through_counter_wrap() {
    // Counter wraps to 0 on the first firing.
    let ticks = TickState::starting_at(u32::MAX);
    let mut h = Harness::new(MockAdc::constant(876));
    let mut seen = Vec::new();
    for _ in 0..3 {
        ticks.fire();
        let report = h.poll(&ticks).unwrap();
        seen.push((report.tick, h.outputs.lit()));
    }
    assert_eq!(
        seen,
        vec![
            (0, Some(OutputChannel::Red)),
            (1, Some(OutputChannel::Green)),
            (2, Some(OutputChannel::Blue)),
        ]
    );
}

#[test]
fn exactly_one_channel_lit_after_every_batch() {
    let mut h = Harness::new(MockAdc::constant(876));
    for n in 0..30 {
        h.batch(n);
        assert_eq!(h.outputs.levels().iter().filter(|l| **l).count(), 1);
    }
}

// ── Temperature task ──────────────────────────────────────────

#[test]
fn each_batch_prints_one_temperature_line() {
    let ticks = TickState::new();
    let mut h = Harness::new(MockAdc::constant(876));
    for _ in 0..3 {
        ticks.fire();
        h.poll(&ticks).unwrap();
    }
    assert_eq!(
        h.console.lines(),
        vec!["Temperatura: 27.14 °C"; 3]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
    assert_eq!(h.adc.selects, vec![4, 4, 4]);
}

#[test]
fn no_pending_tick_means_no_output() {
    let ticks = TickState::new();
    let mut h = Harness::new(MockAdc::constant(876));
    assert_eq!(h.poll(&ticks), None);
    assert!(h.console.diagnostics.is_empty());
    assert!(h.outputs.calls.is_empty());
}

// ── Placeholder cadence ───────────────────────────────────────

#[test]
fn placeholders_gate_on_every_5th_and_10th_tick() {
    let mut h = Harness::new(MockAdc::constant(876));
    let ran: Vec<u8> = (0..=20).map(|n| h.batch(n).ran).collect();
    // 2 always-on tasks, +1 on multiples of 5, +1 more on multiples of 10.
    assert_eq!(
        ran,
        vec![4, 2, 2, 2, 2, 3, 2, 2, 2, 2, 4, 2, 2, 2, 2, 3, 2, 2, 2, 2, 4]
    );
}

// ── Failure isolation ─────────────────────────────────────────

#[test]
fn sensor_failure_does_not_stop_led_or_loop() {
    let adc = MockAdc::sequence(&[
        Ok(876),
        Err(SensorError::AdcReadFailed(-1)),
        Ok(4096),
        Ok(876),
    ]);
    let mut h = Harness::new(adc);

    let reports: Vec<BatchReport> = (0..4).map(|n| h.batch(n)).collect();
    assert_eq!(
        reports.iter().map(|r| r.failed).collect::<Vec<_>>(),
        vec![0, 1, 1, 0]
    );

    assert_eq!(
        h.console.diagnostics,
        vec![
            Diagnostic::Temperature(tempociclo::sensors::temperature::raw_to_celsius(876)),
            Diagnostic::TaskFailed {
                task: TEMPERATURE,
                error: Error::Sensor(SensorError::AdcReadFailed(-1)),
            },
            Diagnostic::TaskFailed {
                task: TEMPERATURE,
                error: Error::Sensor(SensorError::OutOfRange(4096)),
            },
            Diagnostic::Temperature(tempociclo::sensors::temperature::raw_to_celsius(876)),
        ]
    );
    // LED kept cycling through the failures: last batch was tick 3 → Red.
    assert_eq!(h.outputs.lit(), Some(OutputChannel::Red));
    assert_eq!(h.dispatcher.stats().task_failures, 2);
}

#[test]
fn output_failure_still_prints_temperature() {
    let mut h = Harness::new(MockAdc::constant(876));
    h.outputs.broken = true;

    let report = h.batch(0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.ran, 4);
    assert_eq!(
        h.console.lines(),
        vec![
            "Temperatura: 27.14 °C".to_string(),
            format!("Erro na tarefa {}: output: GPIO write failed", RGB_CYCLE),
        ]
    );
    assert_eq!(
        h.console.diagnostics[1],
        Diagnostic::TaskFailed {
            task: RGB_CYCLE,
            error: Error::Output(OutputError::GpioWriteFailed),
        }
    );
}

// ── Coalescing ────────────────────────────────────────────────

#[test]
fn two_fires_before_poll_run_one_batch_at_poll_time_count() {
    let ticks = TickState::new();
    let mut h = Harness::new(MockAdc::constant(876));

    ticks.fire();
    ticks.fire();
    let report = h.poll(&ticks).unwrap();

    assert_eq!(report.tick, 2, "batch must see the poll-time counter");
    assert_eq!(report.coalesced, 1);
    assert_eq!(h.poll(&ticks), None, "no duplicate batch");
    assert_eq!(h.console.diagnostics.len(), 1);
    assert_eq!(h.outputs.lit(), Some(OutputChannel::Blue));
    assert_eq!(ticks.count(), 2);
}

#[test]
fn firing_during_batch_is_kept_for_next_poll() {
    static TICKS: TickState = TickState::new();
    let mut adc = MockAdc::constant(876);
    adc.fire_on_read = Some(&TICKS);
    let mut h = Harness::new(adc);

    TICKS.fire();
    let first = h.poll(&TICKS).unwrap();
    assert_eq!(first.tick, 1);
    assert!(TICKS.is_ready(), "mid-batch firing must not be cleared");

    h.adc.fire_on_read = None;
    let second = h.poll(&TICKS).unwrap();
    assert_eq!(second.tick, 2);
    assert_eq!(h.poll(&TICKS), None);
}

#[test]
fn rgb_writes_are_exclusive_per_batch() {
    let mut h = Harness::new(MockAdc::constant(876));
    h.batch(1);
    let sets: Vec<OutputCall> = h.outputs.calls.clone();
    assert_eq!(
        sets,
        vec![
            OutputCall::Set(OutputChannel::Red, false),
            OutputCall::Set(OutputChannel::Green, true),
            OutputCall::Set(OutputChannel::Blue, false),
        ]
    );
}
