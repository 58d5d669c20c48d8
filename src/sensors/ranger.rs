//! HC-SR04 time-of-flight ranging.
//!
//! Fires `count` pings through a [`PulseTrigger`], converts each echo
//! width to centimetres, rejects timeouts and implausible distances, and
//! averages the rest according to the configured [`InvalidPolicy`].
//! Consecutive pings are separated by a short settle pause so a late echo
//! from one ping is not timed by the next.

use log::debug;

use super::{Accumulator, AveragedReading};
use crate::app::ports::{Clock, PulseTrigger};
use crate::config::{InvalidPolicy, RangerConfig};
use crate::error::{Error, Result, SensorError};

/// One classified ping.  Lives for a single averaging pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSample {
    /// Echo width, `None` on timeout.
    pub duration_us: Option<u32>,
    /// Converted distance; 0 when timed out.
    pub distance_cm: f32,
    pub valid: bool,
}

impl RangeSample {
    pub fn timed_out(&self) -> bool {
        self.duration_us.is_none()
    }

    /// The reason this sample was rejected, if it was.
    pub fn rejection(&self) -> Option<SensorError> {
        match (self.timed_out(), self.valid) {
            (true, _) => Some(SensorError::Timeout),
            (false, false) => Some(SensorError::Implausible),
            (false, true) => None,
        }
    }
}

pub struct Ranger {
    config: RangerConfig,
}

impl Ranger {
    pub fn new(config: RangerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RangerConfig {
        &self.config
    }

    /// Classify a raw echo against the plausible interval.  A zero width
    /// is a timeout, same as `None`.
    pub fn classify(&self, duration_us: Option<u32>) -> RangeSample {
        match duration_us.filter(|&d| d > 0) {
            None => RangeSample {
                duration_us: None,
                distance_cm: 0.0,
                valid: false,
            },
            Some(d) => {
                let distance_cm = self.config.speed.distance_cm(d);
                RangeSample {
                    duration_us: Some(d),
                    distance_cm,
                    valid: distance_cm >= self.config.min_plausible_cm
                        && distance_cm <= self.config.max_plausible_cm,
                }
            }
        }
    }

    /// Averaged reading using the configured sample count.
    pub fn read(
        &self,
        trigger: &mut impl PulseTrigger,
        clock: &mut impl Clock,
    ) -> Result<AveragedReading> {
        self.sample(trigger, clock, self.config.samples)
    }

    /// Take `count` pings and average them.
    ///
    /// Never fails on sensor trouble; if every ping is rejected the
    /// reading carries `no_reading_cm` and `valid_count == 0`.  A zero
    /// count is a configuration error.
    pub fn sample(
        &self,
        trigger: &mut impl PulseTrigger,
        clock: &mut impl Clock,
        count: u8,
    ) -> Result<AveragedReading> {
        if count == 0 {
            return Err(Error::Config("ranger sample count must be positive"));
        }

        let mut acc = Accumulator::default();
        for i in 0..count {
            if i > 0 {
                clock.sleep_ms(self.config.settle_ms);
            }
            let sample = self.classify(trigger.measure(self.config.timeout_us));
            match sample.rejection() {
                None => acc.accept(sample.distance_cm),
                Some(reason) => {
                    debug!("ranger: ping {} rejected ({})", i, reason);
                    if let InvalidPolicy::Penalize { penalty } = self.config.policy {
                        acc.penalise(penalty);
                    }
                }
            }
        }

        Ok(acc.finish(count, self.config.no_reading_cm))
    }

    /// One unaveraged ping filtered for timeout only, for fast radar
    /// sweeps.
    pub fn single(&self, trigger: &mut impl PulseTrigger, timeout_us: u32) -> RangeSample {
        let mut sample = self.classify(trigger.measure(timeout_us));
        sample.valid = !sample.timed_out();
        sample
    }

    /// Distance fit for decisions: valid and below the plausible maximum.
    pub fn usable_distance(&self, reading: &AveragedReading) -> Option<f32> {
        reading.usable_below(self.config.max_plausible_cm)
    }
}
