//! Hardware adapter: bridges the peripheral drivers to the port traits.
//!
//! Owns one driver per port and forwards each call, so [`AppService`]
//! sees a single [`StationHardware`] value.  Radar builds that have no
//! thermometer, or screening builds with no servo, plug in [`Absent`].
//!
//! [`AppService`]: crate::app::service::AppService
//! [`StationHardware`]: crate::app::ports::StationHardware

use embedded_hal::digital::PinState;

use crate::app::ports::{
    AngleActuator, Buzzer, DigitalOutput, OutputLine, PulseTrigger, TemperatureSource,
};
use crate::config::ToneLength;
use crate::error::SensorError;

/// Concrete adapter that combines all station hardware behind the ports.
pub struct HardwareAdapter<R, T, S, B, O> {
    pub ranger: R,
    pub thermometer: T,
    pub servo: S,
    pub buzzer: B,
    pub outputs: O,
}

impl<R, T, S, B, O> HardwareAdapter<R, T, S, B, O> {
    pub fn new(ranger: R, thermometer: T, servo: S, buzzer: B, outputs: O) -> Self {
        Self {
            ranger,
            thermometer,
            servo,
            buzzer,
            outputs,
        }
    }
}

// ── Sensor ports ──────────────────────────────────────────────

impl<R: PulseTrigger, T, S, B, O> PulseTrigger for HardwareAdapter<R, T, S, B, O> {
    fn measure(&mut self, timeout_us: u32) -> Option<u32> {
        self.ranger.measure(timeout_us)
    }
}

impl<R, T: TemperatureSource, S, B, O> TemperatureSource for HardwareAdapter<R, T, S, B, O> {
    fn probe(&mut self) -> Result<(), SensorError> {
        self.thermometer.probe()
    }

    fn read_object_c(&mut self) -> f32 {
        self.thermometer.read_object_c()
    }

    fn read_ambient_c(&mut self) -> f32 {
        self.thermometer.read_ambient_c()
    }
}

// ── Actuator ports ────────────────────────────────────────────

impl<R, T, S: AngleActuator, B, O> AngleActuator for HardwareAdapter<R, T, S, B, O> {
    fn set_angle(&mut self, degrees: i16) {
        self.servo.set_angle(degrees);
    }
}

impl<R, T, S, B: Buzzer, O> Buzzer for HardwareAdapter<R, T, S, B, O> {
    fn tone(&mut self, frequency_hz: u32, length: ToneLength) {
        self.buzzer.tone(frequency_hz, length);
    }

    fn silence(&mut self) {
        self.buzzer.silence();
    }
}

impl<R, T, S, B, O: DigitalOutput> DigitalOutput for HardwareAdapter<R, T, S, B, O> {
    fn set(&mut self, line: OutputLine, level: PinState) {
        self.outputs.set(line, level);
    }
}

// ── Unfitted peripherals ──────────────────────────────────────

/// Stand-in for a peripheral the build does not fit.
#[derive(Debug, Default, Clone, Copy)]
pub struct Absent;

impl TemperatureSource for Absent {
    fn probe(&mut self) -> Result<(), SensorError> {
        Err(SensorError::Bus)
    }

    fn read_object_c(&mut self) -> f32 {
        f32::NAN
    }

    fn read_ambient_c(&mut self) -> f32 {
        f32::NAN
    }
}

impl AngleActuator for Absent {
    fn set_angle(&mut self, _degrees: i16) {}
}

impl Buzzer for Absent {
    fn tone(&mut self, _frequency_hz: u32, _length: ToneLength) {}
    fn silence(&mut self) {}
}

impl DigitalOutput for Absent {
    fn set(&mut self, _line: OutputLine, _level: PinState) {}
}
