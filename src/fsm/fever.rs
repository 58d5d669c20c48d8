//! Fever classification and alert edge tracking.
//!
//! [`classify`] is a pure three-way split of one temperature.
//! [`FeverMonitor`] remembers the last determinate class so the "fever
//! detected" alert is raised once per edge while the buzzer can keep
//! re-sounding every evaluation.  An unusable reading drives the outputs
//! to the safe side but neither raises nor clears the alert.
//!
//! | Class         | Temperature line | Buzzer  |
//! |---------------|------------------|---------|
//! | Normal        | HIGH             | silence |
//! | Fever         | LOW              | sound   |
//! | Indeterminate | LOW              | silence |

use embedded_hal::digital::PinState;
use log::{info, warn};

use crate::config::FeverConfig;
use crate::sensors::AveragedReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeverClass {
    Normal,
    Fever,
    /// Too cold to be skin; the sensor is looking past the subject.
    Indeterminate,
}

/// Classify one temperature.  NaN is indeterminate.
pub fn classify(temp_c: f32, config: &FeverConfig) -> FeverClass {
    if temp_c.is_nan() || temp_c < config.min_plausible_c {
        FeverClass::Indeterminate
    } else if temp_c >= config.fever_threshold_c {
        FeverClass::Fever
    } else {
        FeverClass::Normal
    }
}

/// What the output layer should do after one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeverVerdict {
    pub class: FeverClass,
    pub indicator: PinState,
    pub sound_alert: bool,
    /// True only on the evaluation that moved into `Fever`.
    pub newly_febrile: bool,
}

pub struct FeverMonitor {
    config: FeverConfig,
    last: Option<FeverClass>,
}

impl FeverMonitor {
    pub fn new(config: FeverConfig) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &FeverConfig {
        &self.config
    }

    /// Classify an averaged temperature.  A pass with no valid samples
    /// is indeterminate, whatever its sentinel value.
    pub fn evaluate(&mut self, reading: &AveragedReading) -> FeverVerdict {
        let class = match reading.valid_value() {
            Ok(c) => classify(c, &self.config),
            Err(e) => {
                info!("fever: {}", e);
                FeverClass::Indeterminate
            }
        };

        let newly_febrile = class == FeverClass::Fever && self.last != Some(FeverClass::Fever);
        match class {
            FeverClass::Fever if newly_febrile => {
                warn!("fever: ALERT, {:.1} °C", reading.value);
            }
            FeverClass::Indeterminate if reading.is_valid() => {
                info!("fever: {:.1} °C is below skin range", reading.value);
            }
            _ => {}
        }
        // The latch follows determinate readings only.
        if class != FeverClass::Indeterminate {
            self.last = Some(class);
        }

        FeverVerdict {
            class,
            indicator: match class {
                FeverClass::Normal => PinState::High,
                FeverClass::Fever | FeverClass::Indeterminate => PinState::Low,
            },
            sound_alert: class == FeverClass::Fever,
            newly_febrile,
        }
    }

    /// Last Normal or Fever class since the previous reset.
    pub fn last(&self) -> Option<FeverClass> {
        self.last
    }

    pub fn alert_active(&self) -> bool {
        self.last == Some(FeverClass::Fever)
    }

    /// Forget the previous class (subject left).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
