//! Sticky presence detection.
//!
//! ```text
//!  ABSENT ──[valid && d <= threshold]──▶ PRESENT
//!    ▲                                      │
//!    └──[now - last_detection >= timeout]───┘
//! ```
//!
//! Entry is immediate: the ranger's own averaging already smooths the
//! input.  Exit only happens after `timeout_ms` with no qualifying
//! reading, so a subject who shifts out of range for a tick or two stays
//! present.  Each edge is reported exactly once.

use log::info;

use crate::config::PresenceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Absent,
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    Arrived,
    Departed,
}

pub struct PresenceDebouncer {
    threshold_cm: f32,
    timeout_ms: u64,
    state: PresenceState,
    last_detection_ms: Option<u64>,
}

impl PresenceDebouncer {
    pub fn new(config: &PresenceConfig) -> Self {
        Self {
            threshold_cm: config.threshold_cm,
            timeout_ms: u64::from(config.timeout_ms),
            state: PresenceState::Absent,
            last_detection_ms: None,
        }
    }

    /// Whether a usable distance counts as a detection.
    pub fn qualifies(&self, distance_cm: Option<f32>) -> bool {
        distance_cm.is_some_and(|d| d <= self.threshold_cm)
    }

    /// Feed one reading.  `distance_cm` is `None` when the ranger had no
    /// usable value this tick.
    pub fn update(&mut self, now_ms: u64, distance_cm: Option<f32>) -> Option<PresenceEdge> {
        if self.qualifies(distance_cm) {
            self.last_detection_ms = Some(now_ms);
            if self.state == PresenceState::Absent {
                self.state = PresenceState::Present;
                info!("presence: subject detected at {:.1} cm", distance_cm.unwrap_or_default());
                return Some(PresenceEdge::Arrived);
            }
            return None;
        }

        if self.state == PresenceState::Present {
            let since = now_ms.saturating_sub(self.last_detection_ms.unwrap_or(now_ms));
            if since >= self.timeout_ms {
                self.state = PresenceState::Absent;
                self.last_detection_ms = None;
                info!("presence: no detection for {} ms, subject left", since);
                return Some(PresenceEdge::Departed);
            }
        }
        None
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    pub fn is_present(&self) -> bool {
        self.state == PresenceState::Present
    }

    pub fn last_detection_ms(&self) -> Option<u64> {
        self.last_detection_ms
    }
}
