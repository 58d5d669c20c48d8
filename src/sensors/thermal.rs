//! IR object-temperature averaging (MLX90614).
//!
//! The thermometer occasionally returns NaN (bus glitch, PEC failure) and
//! reports background temperatures when nothing warm fills its field of
//! view.  Under [`NanPolicy::Exclude`] both are dropped from the mean;
//! under [`NanPolicy::Zero`] NaN is read as 0 °C and no range check is
//! applied.
//!
//! An empty pass returns 0.0 with `valid_count == 0`.  That zero is a
//! sentinel, not a temperature.

use log::debug;

use super::{Accumulator, AveragedReading};
use crate::app::ports::{Clock, TemperatureSource};
use crate::config::{NanPolicy, ThermalConfig};
use crate::error::{Error, Result};

/// Reported when no sample was accepted.
pub const NO_TEMPERATURE_C: f32 = 0.0;

pub struct ThermalSampler {
    config: ThermalConfig,
}

impl ThermalSampler {
    pub fn new(config: ThermalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThermalConfig {
        &self.config
    }

    /// Averaged object temperature using the configured sample count.
    pub fn read(
        &self,
        source: &mut impl TemperatureSource,
        clock: &mut impl Clock,
    ) -> Result<AveragedReading> {
        self.sample(source, clock, self.config.samples)
    }

    pub fn sample(
        &self,
        source: &mut impl TemperatureSource,
        clock: &mut impl Clock,
        count: u8,
    ) -> Result<AveragedReading> {
        if count == 0 {
            return Err(Error::Config("thermal sample count must be positive"));
        }

        let mut acc = Accumulator::default();
        for i in 0..count {
            if i > 0 {
                clock.sleep_ms(self.config.settle_ms);
            }
            let t = source.read_object_c();
            match self.config.policy {
                NanPolicy::Zero if t.is_nan() => acc.penalise(0.0),
                NanPolicy::Zero => acc.accept(t),
                NanPolicy::Exclude if self.plausible(t) => acc.accept(t),
                NanPolicy::Exclude => debug!("thermal: sample {} rejected ({})", i, t),
            }
        }

        Ok(acc.finish(count, NO_TEMPERATURE_C))
    }

    /// Single informational ambient read; not averaged, not classified.
    pub fn ambient(&self, source: &mut impl TemperatureSource) -> Option<f32> {
        let t = source.read_ambient_c();
        (!t.is_nan()).then_some(t)
    }

    fn plausible(&self, t: f32) -> bool {
        t >= self.config.min_plausible_c && t <= self.config.max_plausible_c
    }
}
