//! Presence and temperature-OK indicator lines.
//!
//! Both are plain push-pull outputs read by downstream logic.  The pair
//! is driven LOW at construction so nothing reads a floating level
//! before the first tick.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::{DigitalOutput, OutputLine};
use crate::error::ActuatorError;

pub struct IndicatorPins<P, T> {
    presence: P,
    temperature: T,
}

impl<P: OutputPin, T: OutputPin> IndicatorPins<P, T> {
    pub fn new(presence: P, temperature: T) -> Self {
        let mut pins = Self {
            presence,
            temperature,
        };
        pins.set(OutputLine::Presence, PinState::Low);
        pins.set(OutputLine::Temperature, PinState::Low);
        pins
    }

    pub fn drive(&mut self, line: OutputLine, level: PinState) -> Result<(), ActuatorError> {
        let ok = match line {
            OutputLine::Presence => self.presence.set_state(level).is_ok(),
            OutputLine::Temperature => self.temperature.set_state(level).is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(ActuatorError::GpioWriteFailed)
        }
    }
}

impl<P: OutputPin, T: OutputPin> DigitalOutput for IndicatorPins<P, T> {
    fn set(&mut self, line: OutputLine, level: PinState) {
        if let Err(e) = self.drive(line, level) {
            warn!("{:?} line: {}", line, e);
        }
    }
}
