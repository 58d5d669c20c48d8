//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per application event to
//! the ESP-IDF logger (UART / USB-CDC in production).  This is the
//! station's diagnostic stream.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::{AppEvent, ScanReport, ScreeningReport, ScreeningStatus};
use crate::app::ports::EventSink;
use crate::fsm::presence::PresenceEdge;
use crate::fsm::scan::{ScanEdge, ScanMode};

/// Longest formatted report line.
const LINE_CAP: usize = 160;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Render a screening tick as one line.
pub fn screening_line(r: &ScreeningReport) -> heapless::String<LINE_CAP> {
    let mut line = heapless::String::new();
    // Overflow only truncates the diagnostic line.
    let _ = match r.distance_cm {
        Some(d) => write!(line, "DIST | {:.1} cm", d),
        None => write!(line, "DIST | out of range"),
    };
    let _ = write!(line, " ({}/{})", r.valid_samples, r.requested_samples);
    if let Some(t) = &r.temperature {
        let tag = if r.temperature_sampled { "TEMP" } else { "TEMP(last)" };
        let _ = match t.object_c {
            Some(c) => write!(line, " | {} obj={:.2}\u{00b0}C", tag, c),
            None => write!(line, " | {} obj=--", tag),
        };
        if let Some(a) = t.ambient_c {
            let _ = write!(line, " amb={:.2}\u{00b0}C", a);
        }
        let _ = write!(line, " {:?}", t.class);
    }
    let status = match r.status {
        ScreeningStatus::Waiting => "waiting",
        ScreeningStatus::PresentNormal => "present - normal",
        ScreeningStatus::PresentFever => "present - FEVER",
    };
    let _ = write!(line, " | {:?} | {}", r.presence, status);
    line
}

/// Render a radar measurement as one line.
pub fn scan_line(r: &ScanReport) -> heapless::String<LINE_CAP> {
    let mut line = heapless::String::new();
    let mode = match r.mode {
        ScanMode::Sweeping => "SWEEP",
        ScanMode::Holding => "HOLD",
    };
    let _ = match (r.distance_cm, r.point) {
        (Some(d), Some((x, y))) => write!(
            line,
            "SCAN | {:>3}\u{00b0} | {:.1} cm | x={:.1} y={:.1} | {}",
            r.angle, d, x, y, mode
        ),
        (Some(d), None) => write!(line, "SCAN | {:>3}\u{00b0} | {:.1} cm | {}", r.angle, d, mode),
        (None, _) => write!(line, "SCAN | {:>3}\u{00b0} | no echo | {}", r.angle, mode),
    };
    line
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => info!("START | mode={:?}", mode),
            AppEvent::Screening(r) => info!("{}", screening_line(r)),
            AppEvent::Presence(PresenceEdge::Arrived) => info!("PRESENCE | subject detected"),
            AppEvent::Presence(PresenceEdge::Departed) => info!("PRESENCE | subject left"),
            AppEvent::FeverAlert { temperature_c } => {
                warn!("FEVER | {:.2}\u{00b0}C", temperature_c);
            }
            AppEvent::Scan(r) => info!("{}", scan_line(r)),
            AppEvent::Hold {
                edge: ScanEdge::HoldEntered,
                angle,
            } => info!("HOLD | detected at {}\u{00b0}, servo stopped", angle),
            AppEvent::Hold {
                edge: ScanEdge::HoldReleased,
                angle,
            } => info!("HOLD | released at {}\u{00b0}, sweep resumed", angle),
        }
    }
}
