//! Hobby servo on a 50 Hz PWM channel.
//!
//! Angle maps linearly onto a 544–2400 µs pulse inside the 20 ms frame,
//! the range the common SG90/MG90 horns accept.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::AngleActuator;
use crate::error::ActuatorError;

pub const MIN_PULSE_US: u32 = 544;
pub const MAX_PULSE_US: u32 = 2400;
pub const FRAME_US: u32 = 20_000;

/// Pulse width for `degrees`, clamped to 0–180.
pub fn pulse_width_us(degrees: i16) -> u32 {
    let deg = degrees.clamp(0, 180) as u32;
    MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * deg / 180
}

pub struct Servo<P> {
    pwm: P,
    angle: Option<i16>,
}

impl<P: SetDutyCycle> Servo<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    /// Last angle written, `None` before the first write.
    pub fn angle(&self) -> Option<i16> {
        self.angle
    }

    /// Write the pulse for `degrees`.  The remembered angle only moves
    /// when the duty write succeeds.
    pub fn write(&mut self, degrees: i16) -> Result<(), ActuatorError> {
        let pulse = pulse_width_us(degrees) as u16;
        self.pwm
            .set_duty_cycle_fraction(pulse, FRAME_US as u16)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.angle = Some(degrees.clamp(0, 180));
        Ok(())
    }
}

impl<P: SetDutyCycle> AngleActuator for Servo<P> {
    fn set_angle(&mut self, degrees: i16) {
        if let Err(e) = self.write(degrees) {
            warn!("servo: {} at {}°", e, degrees);
        }
    }
}
