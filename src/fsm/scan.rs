//! Scan/hold controller for the sweep radar.
//!
//! ```text
//!  SWEEPING ──[detect_count >= detect_confirm]──▶ HOLDING
//!     ▲                                              │
//!     └──[no_detect_count >= no_detect_confirm]──────┘
//! ```
//!
//! Stepping and measuring are separate inputs: the servo only moves while
//! sweeping, measurements are taken in both modes.  The clear-reading
//! counter only runs while holding, so a sweep past empty space never
//! builds up credit toward leaving a hold that has not started.

use log::info;

use crate::config::ScanConfig;
use crate::control::sweep::{Direction, SweepGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Sweeping,
    Holding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEdge {
    HoldEntered,
    HoldReleased,
}

pub struct ScanHoldController {
    sweep: SweepGenerator,
    mode: ScanMode,
    detect_count: u8,
    no_detect_count: u8,
    threshold_cm: f32,
    detect_confirm: u8,
    no_detect_confirm: u8,
    hold_enabled: bool,
}

impl ScanHoldController {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            sweep: SweepGenerator::new(config.min_angle, config.max_angle, config.step_degrees),
            mode: ScanMode::Sweeping,
            detect_count: 0,
            no_detect_count: 0,
            threshold_cm: config.detect_threshold_cm,
            detect_confirm: config.detect_confirm,
            no_detect_confirm: config.no_detect_confirm,
            hold_enabled: config.hold_enabled,
        }
    }

    /// Advance the sweep one step.  Returns the new angle, or `None`
    /// while holding (the servo stays where it stopped).
    pub fn step(&mut self) -> Option<i16> {
        match self.mode {
            ScanMode::Sweeping => Some(self.sweep.advance()),
            ScanMode::Holding => None,
        }
    }

    /// Feed one radar measurement.  `distance_cm` is `None` on echo
    /// timeout.
    pub fn on_measurement(&mut self, distance_cm: Option<f32>) -> Option<ScanEdge> {
        let detected = distance_cm.is_some_and(|d| d > 0.0 && d <= self.threshold_cm);

        if detected {
            self.detect_count = self.detect_count.saturating_add(1);
            self.no_detect_count = 0;
        } else {
            self.detect_count = 0;
            self.no_detect_count = match self.mode {
                ScanMode::Holding => self.no_detect_count.saturating_add(1),
                ScanMode::Sweeping => 0,
            };
        }

        match self.mode {
            ScanMode::Sweeping if self.hold_enabled && self.detect_count >= self.detect_confirm => {
                self.mode = ScanMode::Holding;
                info!("scan: object confirmed, holding at {}°", self.sweep.angle());
                Some(ScanEdge::HoldEntered)
            }
            ScanMode::Holding if self.no_detect_count >= self.no_detect_confirm => {
                self.mode = ScanMode::Sweeping;
                self.detect_count = 0;
                self.no_detect_count = 0;
                info!("scan: area clear, resuming sweep from {}°", self.sweep.angle());
                Some(ScanEdge::HoldReleased)
            }
            _ => None,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn angle(&self) -> i16 {
        self.sweep.angle()
    }

    pub fn direction(&self) -> Direction {
        self.sweep.direction()
    }

    pub fn detect_count(&self) -> u8 {
        self.detect_count
    }

    pub fn no_detect_count(&self) -> u8 {
        self.no_detect_count
    }
}
