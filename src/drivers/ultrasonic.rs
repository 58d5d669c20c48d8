//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs HIGH pulse on TRIG fires a burst; ECHO then goes HIGH for the
//! round-trip time of flight.  The echo is timed by busy-polling the pin
//! against a microsecond counter, with one deadline covering both the
//! wait for the rising edge and the pulse itself.
//!
//! ```text
//!  TRIG ──┐ 2µs ┌──10µs──┐
//!         └─────┘        └──────────────────────────
//!  ECHO ─────────────────────┐   width = tof   ┌───
//!                            └─────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::PulseTrigger;

const TRIGGER_SETTLE_US: u32 = 2;
const TRIGGER_PULSE_US: u32 = 10;

/// HC-SR04 on one output and one input pin.
///
/// `micros` is a free-running monotonic microsecond counter, e.g.
/// `esp_timer_get_time` on the target.
pub struct Hcsr04<T, E, D, M> {
    trig: T,
    echo: E,
    delay: D,
    micros: M,
}

impl<T, E, D, M> Hcsr04<T, E, D, M>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    M: FnMut() -> u64,
{
    pub fn new(trig: T, echo: E, delay: D, micros: M) -> Self {
        Self {
            trig,
            echo,
            delay,
            micros,
        }
    }

    fn fire(&mut self) -> bool {
        let ok = self.trig.set_low().is_ok();
        self.delay.delay_us(TRIGGER_SETTLE_US);
        let ok = ok && self.trig.set_high().is_ok();
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trig.set_low().is_ok() && ok
    }

    /// Spin until ECHO reads `high`, returning the timestamp, or `None`
    /// once `deadline` passes.  A pin read error ends the wait.
    fn wait_for(&mut self, high: bool, deadline: u64) -> Option<u64> {
        loop {
            let now = (self.micros)();
            match self.echo.is_high() {
                Ok(level) if level == high => return Some(now),
                Ok(_) if now < deadline => {}
                _ => return None,
            }
        }
    }
}

impl<T, E, D, M> PulseTrigger for Hcsr04<T, E, D, M>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    M: FnMut() -> u64,
{
    fn measure(&mut self, timeout_us: u32) -> Option<u32> {
        if !self.fire() {
            warn!("HC-SR04: trigger pin write failed");
            return None;
        }
        let deadline = (self.micros)() + u64::from(timeout_us);
        let rise = self.wait_for(true, deadline)?;
        let fall = self.wait_for(false, deadline)?;
        u32::try_from(fall - rise).ok()
    }
}
