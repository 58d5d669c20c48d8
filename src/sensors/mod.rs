//! Sensor subsystem: averaging samplers over the sensor ports.
//!
//! Both samplers take a fixed number of raw samples per pass, reject the
//! implausible ones, and fold the rest into an [`AveragedReading`].  A
//! pass where nothing survived still produces a reading: the configured
//! sentinel with `valid_count == 0`.

pub mod ranger;
pub mod thermal;

use crate::error::SensorError;

/// Result of one averaging pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedReading {
    /// Mean of the accepted samples, or the sentinel when none were.
    pub value: f32,
    /// Samples that passed validation.
    pub valid_count: u8,
    /// Samples taken.
    pub requested_count: u8,
}

impl AveragedReading {
    /// At least one sample was accepted.
    pub fn is_valid(&self) -> bool {
        self.valid_count > 0
    }

    /// The mean, or [`SensorError::AllSamplesInvalid`] when the value is
    /// only the sentinel.
    pub fn valid_value(&self) -> Result<f32, SensorError> {
        if self.is_valid() {
            Ok(self.value)
        } else {
            Err(SensorError::AllSamplesInvalid)
        }
    }

    /// The value, if valid and strictly below `max`.  Sentinels and
    /// penalty-inflated means at or above the range limit come back `None`.
    pub fn usable_below(&self, max: f32) -> Option<f32> {
        self.valid_value().ok().filter(|&v| v < max)
    }
}

/// Running sum for one averaging pass.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    sum: f32,
    valid: u8,
    penalised: u8,
}

impl Accumulator {
    pub(crate) fn accept(&mut self, value: f32) {
        self.sum += value;
        self.valid = self.valid.saturating_add(1);
    }

    /// Count a rejected sample as `penalty` without crediting it as valid.
    pub(crate) fn penalise(&mut self, penalty: f32) {
        self.sum += penalty;
        self.penalised = self.penalised.saturating_add(1);
    }

    pub(crate) fn finish(self, requested: u8, sentinel: f32) -> AveragedReading {
        let value = if self.valid == 0 {
            sentinel
        } else {
            self.sum / f32::from(self.valid + self.penalised)
        };
        AveragedReading {
            value,
            valid_count: self.valid,
            requested_count: requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pass_yields_sentinel() {
        let r = Accumulator::default().finish(3, 999.9);
        assert_eq!(r.value, 999.9);
        assert!(!r.is_valid());
        assert_eq!(r.valid_value(), Err(SensorError::AllSamplesInvalid));
        assert_eq!(r.usable_below(400.0), None);
    }

    #[test]
    fn penalties_alone_never_make_a_reading() {
        let mut acc = Accumulator::default();
        acc.penalise(50.0);
        acc.penalise(50.0);
        let r = acc.finish(2, 999.9);
        assert_eq!(r.value, 999.9);
        assert_eq!(r.valid_count, 0);
    }

    #[test]
    fn penalties_share_the_denominator() {
        let mut acc = Accumulator::default();
        acc.accept(10.0);
        acc.penalise(50.0);
        let r = acc.finish(2, 999.9);
        assert_eq!(r.value, 30.0);
        assert_eq!(r.valid_count, 1);
    }

    #[test]
    fn usable_below_is_strict() {
        let r = AveragedReading {
            value: 400.0,
            valid_count: 1,
            requested_count: 1,
        };
        assert_eq!(r.usable_below(400.0), None);
        assert_eq!(r.usable_below(400.1), Some(400.0));
    }
}
