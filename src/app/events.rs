//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  One report per activity
//! forms the diagnostic stream; edges are emitted once each.

use crate::config::StationMode;
use crate::fsm::context::SensorSnapshot;
use crate::fsm::fever::FeverClass;
use crate::fsm::presence::{PresenceEdge, PresenceState};
use crate::fsm::scan::{ScanEdge, ScanMode};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service started (carries the configured mode).
    Started(StationMode),

    /// One screening tick.
    Screening(ScreeningReport),

    /// Presence debouncer changed state.
    Presence(PresenceEdge),

    /// Temperature moved into the fever class.
    FeverAlert { temperature_c: f32 },

    /// One radar measurement.
    Scan(ScanReport),

    /// Scan/hold controller changed mode.
    Hold { edge: ScanEdge, angle: i16 },
}

/// Temperature sampled during a screening tick.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureReport {
    /// Mean object temperature, `None` if no sample was valid.
    pub object_c: Option<f32>,
    pub ambient_c: Option<f32>,
    pub class: FeverClass,
}

impl TemperatureReport {
    /// The temperature still on record for the current subject.
    pub fn from_snapshot(sensors: &SensorSnapshot) -> Option<Self> {
        let temp = sensors.object_temp?;
        Some(Self {
            object_c: temp.valid_value().ok(),
            ambient_c: sensors.ambient_c,
            class: sensors.fever_class?,
        })
    }
}

/// Summary line of the screening station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningStatus {
    Waiting,
    PresentNormal,
    PresentFever,
}

#[derive(Debug, Clone, Copy)]
pub struct ScreeningReport {
    /// Usable averaged distance, `None` when out of range.
    pub distance_cm: Option<f32>,
    pub valid_samples: u8,
    pub requested_samples: u8,
    pub presence: PresenceState,
    /// Latest temperature of the current subject, `None` while nobody has
    /// been measured.
    pub temperature: Option<TemperatureReport>,
    /// The thermometer was read on this tick; otherwise `temperature` is
    /// carried over from an earlier one.
    pub temperature_sampled: bool,
    pub status: ScreeningStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanReport {
    pub angle: i16,
    /// `None` on echo timeout.
    pub distance_cm: Option<f32>,
    pub mode: ScanMode,
    /// Cartesian projection of the return (x, y) in cm.
    pub point: Option<(f32, f32)>,
}
