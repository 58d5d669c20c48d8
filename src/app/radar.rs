//! Radar pipeline: servo sweep with scan/hold on near objects.

use log::debug;

use super::events::{AppEvent, ScanReport};
use super::ports::{AngleActuator, Clock, EventSink, PulseTrigger};
use crate::config::StationConfig;
use crate::control::sweep::polar_to_cartesian;
use crate::fsm::scan::{ScanHoldController, ScanMode};
use crate::sensors::ranger::Ranger;

/// Pause after the start-up servo write so the horn reaches `min_angle`.
pub const SERVO_HOME_SETTLE_MS: u32 = 200;

pub struct RadarPipeline {
    scan: ScanHoldController,
    pulse_timeout_us: u32,
    servo_settle_ms: u32,
}

impl RadarPipeline {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            scan: ScanHoldController::new(&config.scan),
            pulse_timeout_us: config.scan.pulse_timeout_us,
            servo_settle_ms: config.scan.servo_settle_ms,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.scan.mode()
    }

    pub fn angle(&self) -> i16 {
        self.scan.angle()
    }

    /// Drive the servo to the sweep start.
    pub fn home(&mut self, hw: &mut impl AngleActuator, clock: &mut impl Clock) {
        hw.set_angle(self.scan.angle());
        clock.sleep_ms(SERVO_HOME_SETTLE_MS);
    }

    /// Measurement activity: one unaveraged ping.
    pub fn measure(
        &mut self,
        ranger: &Ranger,
        hw: &mut impl PulseTrigger,
        sink: &mut impl EventSink,
    ) {
        let sample = ranger.single(hw, self.pulse_timeout_us);
        let distance = sample.valid.then_some(sample.distance_cm);
        let angle = self.scan.angle();

        sink.emit(&AppEvent::Scan(ScanReport {
            angle,
            distance_cm: distance,
            mode: self.scan.mode(),
            point: distance.map(|d| polar_to_cartesian(angle, d)),
        }));

        if let Some(edge) = self.scan.on_measurement(distance) {
            sink.emit(&AppEvent::Hold { edge, angle });
        }
    }

    /// Step activity: advance the sweep unless holding.
    pub fn step(&mut self, hw: &mut impl AngleActuator, clock: &mut impl Clock) {
        match self.scan.step() {
            Some(angle) => {
                hw.set_angle(angle);
                if self.servo_settle_ms > 0 {
                    clock.sleep_ms(self.servo_settle_ms);
                }
            }
            None => debug!("radar: holding at {}°", self.scan.angle()),
        }
    }
}
