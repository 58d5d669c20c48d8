//! Mock hardware adapter for integration tests.
//!
//! Scripted sensors feed the control loop; every actuator call is
//! recorded so tests can assert on the full command history without
//! touching real GPIO/PWM registers.  The fake clock only moves when the
//! code under test sleeps or the test advances it.

use std::collections::VecDeque;

use embedded_hal::digital::PinState;
use rangewatch::app::events::AppEvent;
use rangewatch::app::ports::{
    AngleActuator, Buzzer, Clock, DigitalOutput, EventSink, OutputLine, PulseTrigger,
    TemperatureSource,
};
use rangewatch::app::service::AppService;
use rangewatch::config::ToneLength;
use rangewatch::error::SensorError;

/// Echo width for a distance at 343 m/s.
pub fn echo_for_cm(cm: f32) -> u32 {
    (cm * 2.0 / 0.0343).round() as u32
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetLine { line: OutputLine, level: PinState },
    Tone { frequency_hz: u32, length: ToneLength },
    Silence,
    SetAngle(i16),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Echoes consumed one per ping, then `echo_fallback` repeats.
    pub echoes: VecDeque<Option<u32>>,
    pub echo_fallback: Option<u32>,
    /// Object temperatures consumed one per read, then the fallback.
    pub temps: VecDeque<f32>,
    pub temp_fallback: f32,
    pub ambient_c: f32,
    pub probe_ok: bool,
    pub pings: usize,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            echoes: VecDeque::new(),
            echo_fallback: None,
            temps: VecDeque::new(),
            temp_fallback: f32::NAN,
            ambient_c: 24.0,
            probe_ok: true,
            pings: 0,
            calls: Vec::new(),
        }
    }

    /// Subject standing at `cm`.
    pub fn subject_at(&mut self, cm: f32) {
        self.echo_fallback = Some(echo_for_cm(cm));
    }

    pub fn nobody(&mut self) {
        self.echo_fallback = None;
    }

    pub fn line(&self, line: OutputLine) -> Option<PinState> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetLine { line: l, level } if *l == line => Some(*level),
            _ => None,
        })
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Tone { .. } => Some(true),
                ActuatorCall::Silence => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn tones(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Tone { .. }))
            .count()
    }

    pub fn angles(&self) -> Vec<i16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::SetAngle(a) => Some(*a),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseTrigger for MockHardware {
    fn measure(&mut self, _timeout_us: u32) -> Option<u32> {
        self.pings += 1;
        self.echoes.pop_front().unwrap_or(self.echo_fallback)
    }
}

impl TemperatureSource for MockHardware {
    fn probe(&mut self) -> Result<(), SensorError> {
        if self.probe_ok {
            Ok(())
        } else {
            Err(SensorError::Bus)
        }
    }

    fn read_object_c(&mut self) -> f32 {
        self.temps.pop_front().unwrap_or(self.temp_fallback)
    }

    fn read_ambient_c(&mut self) -> f32 {
        self.ambient_c
    }
}

impl AngleActuator for MockHardware {
    fn set_angle(&mut self, degrees: i16) {
        self.calls.push(ActuatorCall::SetAngle(degrees));
    }
}

impl DigitalOutput for MockHardware {
    fn set(&mut self, line: OutputLine, level: PinState) {
        self.calls.push(ActuatorCall::SetLine { line, level });
    }
}

impl Buzzer for MockHardware {
    fn tone(&mut self, frequency_hz: u32, length: ToneLength) {
        self.calls.push(ActuatorCall::Tone {
            frequency_hz,
            length,
        });
    }

    fn silence(&mut self) {
        self.calls.push(ActuatorCall::Silence);
    }
}

// ── FakeClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeClock {
    pub now: u64,
    pub slept_ms: u64,
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
        self.slept_ms += u64::from(ms);
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Service plus everything it drives.
pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub clock: FakeClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(app: AppService) -> Self {
        Self {
            app,
            hw: MockHardware::new(),
            clock: FakeClock::default(),
            sink: RecordingSink::default(),
        }
    }

    pub fn start(&mut self) -> rangewatch::error::Result<()> {
        self.app.start(&mut self.hw, &mut self.clock, &mut self.sink)
    }

    /// Poll the loop, idling between polls as `main` does, until the
    /// clock reaches `until_ms`.
    pub fn run_until(&mut self, until_ms: u64) {
        while self.clock.now < until_ms {
            self.app
                .poll(&mut self.hw, &mut self.clock, &mut self.sink)
                .expect("poll");
            let idle = self.app.idle_ms(&self.clock);
            self.clock.sleep_ms(idle as u32);
        }
    }

    pub fn run_for(&mut self, ms: u64) {
        let until = self.clock.now + ms;
        self.run_until(until);
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.sink.events.iter().filter(|e| pred(e)).count()
    }
}
