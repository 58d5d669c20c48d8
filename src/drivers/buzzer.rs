//! Passive piezo buzzer on a PWM channel.
//!
//! The tone frequency is the PWM timer frequency, fixed when the channel
//! is configured ([`BUZZER_PWM_FREQ_HZ`](crate::pins::BUZZER_PWM_FREQ_HZ)).
//! A sounding tone is a 50 % duty square wave; silence is duty 0.
//! Timed tones are ended by the control loop, not by this driver.

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::app::ports::Buzzer;
use crate::config::ToneLength;
use crate::error::ActuatorError;

pub struct PwmBuzzer<P> {
    pwm: P,
    timer_hz: u32,
    sounding: bool,
}

impl<P: SetDutyCycle> PwmBuzzer<P> {
    /// `timer_hz` is the frequency the channel's timer was configured with.
    pub fn new(pwm: P, timer_hz: u32) -> Self {
        Self {
            pwm,
            timer_hz,
            sounding: false,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    /// Square wave on, or off.
    pub fn drive(&mut self, on: bool) -> Result<(), ActuatorError> {
        let written = if on {
            self.pwm.set_duty_cycle_percent(50)
        } else {
            self.pwm.set_duty_cycle_fully_off()
        };
        written.map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.sounding = on;
        Ok(())
    }
}

impl<P: SetDutyCycle> Buzzer for PwmBuzzer<P> {
    fn tone(&mut self, frequency_hz: u32, length: ToneLength) {
        if frequency_hz != self.timer_hz {
            debug!(
                "buzzer: {} Hz requested, timer fixed at {} Hz",
                frequency_hz, self.timer_hz
            );
        }
        if let Err(e) = self.drive(true) {
            warn!("buzzer: {} ({:?})", e, length);
        }
    }

    fn silence(&mut self) {
        if let Err(e) = self.drive(false) {
            warn!("buzzer: {} on silence", e);
        }
    }
}
