//! Cooperative periodic scheduler.
//!
//! The station is a single polling loop.  Instead of sequencing work with
//! blocking delays, each periodic activity keeps a "last run" watermark
//! and the loop asks which activities are due against a monotonic clock.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main loop ─▶ Scheduler::due(now) ─▶ [Measure, Step, …]  │
//! │                     │                                    │
//! │        per-slot watermark: now - last_run >= period      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All activities due at one poll are returned together, so a slow
//! activity delays the next one by at most a single poll.

use heapless::Vec;
use log::{debug, info};

/// Maximum number of concurrent schedules (stack-allocated).
pub const MAX_SCHEDULES: usize = 4;

/// Periodic work the control loop multiplexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Averaged ranging + presence/fever decision.
    Screen,
    /// Single radar ping + scan/hold decision.
    Measure,
    /// One servo sweep step.
    Step,
}

/// Internal bookkeeping for a live schedule.
#[derive(Debug, Clone)]
struct ScheduleEntry {
    activity: Activity,
    period_ms: u64,
    /// `None` until the first run, which happens on the first poll.
    last_run_ms: Option<u64>,
}

pub struct Scheduler {
    schedules: Vec<ScheduleEntry, MAX_SCHEDULES>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: Vec::new(),
        }
    }

    /// Register an activity.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, activity: Activity, period_ms: u32) -> Option<usize> {
        let entry = ScheduleEntry {
            activity,
            period_ms: u64::from(period_ms),
            last_run_ms: None,
        };
        self.schedules.push(entry).ok()?;
        info!("Scheduler: {:?} every {} ms", activity, period_ms);
        Some(self.schedules.len() - 1)
    }

    /// Activities due at `now_ms`, in registration order.  Each returned
    /// activity has its watermark moved to `now_ms`.
    pub fn due(&mut self, now_ms: u64) -> Vec<Activity, MAX_SCHEDULES> {
        let mut due = Vec::new();
        for entry in &mut self.schedules {
            let ready = entry
                .last_run_ms
                .is_none_or(|last| now_ms.saturating_sub(last) >= entry.period_ms);
            if ready {
                entry.last_run_ms = Some(now_ms);
                // Capacity matches the slot count, push cannot fail.
                let _ = due.push(entry.activity);
            }
        }
        if !due.is_empty() {
            debug!("Scheduler: due at {} ms: {:?}", now_ms, due);
        }
        due
    }

    /// Milliseconds until the next activity is due (0 if one already is).
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        self.schedules
            .iter()
            .map(|e| match e.last_run_ms {
                None => 0,
                Some(last) => (last + e.period_ms).saturating_sub(now_ms),
            })
            .min()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
