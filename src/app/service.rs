//! Application service: the hexagonal core.
//!
//! [`AppService`] owns every piece of control-loop state: the scheduler,
//! the ranger, the active pipeline, and the shared context.  All I/O
//! flows through port traits passed in at call sites, so the whole
//! service runs on the host with mock adapters and a fake clock.
//!
//! ```text
//!  PulseTrigger ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!  Temperature  ──▶ │         AppService          │
//!  Clock        ──▶ │ Scheduler · Ranger · FSMs   │ ──▶ DigitalOutput
//!                   └────────────────────────────┘ ──▶ Buzzer / Servo
//! ```

use log::{error, info, warn};

use crate::config::{StationConfig, StationMode, ToneLength};
use crate::error::{Error, Result};
use crate::fsm::context::{BuzzerCommand, StationContext};
use crate::fsm::presence::PresenceState;
use crate::fsm::scan::ScanMode;
use crate::scheduler::{Activity, Scheduler};
use crate::sensors::ranger::Ranger;

use super::events::AppEvent;
use super::ports::{Clock, EventSink, OutputLine, StationHardware};
use super::radar::RadarPipeline;
use super::screening::ScreeningPipeline;

enum Pipeline {
    Screening(ScreeningPipeline),
    Radar(RadarPipeline),
}

/// Discrete state of the running pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationState {
    Screening(PresenceState),
    Radar(ScanMode),
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: StationConfig,
    ctx: StationContext,
    scheduler: Scheduler,
    ranger: Ranger,
    pipeline: Pipeline,
    /// When the current timed alert tone must stop.
    tone_deadline_ms: Option<u64>,
    started: bool,
}

impl AppService {
    /// Validate the configuration and build the pipeline it selects.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: StationConfig) -> Result<Self> {
        config.validate()?;

        let mut scheduler = Scheduler::new();
        let pipeline = match config.mode {
            StationMode::Screening => {
                scheduler.add(Activity::Screen, config.presence.loop_interval_ms);
                Pipeline::Screening(ScreeningPipeline::new(&config))
            }
            StationMode::Radar => {
                scheduler.add(Activity::Measure, config.scan.measure_interval_ms);
                scheduler.add(Activity::Step, config.scan.step_delay_ms);
                Pipeline::Radar(RadarPipeline::new(&config))
            }
        };

        Ok(Self {
            ranger: Ranger::new(config.ranger.clone()),
            config,
            ctx: StationContext::new(),
            scheduler,
            pipeline,
            tone_deadline_ms: None,
            started: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its power-up level and bring up the
    /// peripherals the mode needs.
    ///
    /// A thermometer that does not answer is fatal for screening: the
    /// error is returned and the caller must not run the loop.
    pub fn start(
        &mut self,
        hw: &mut impl StationHardware,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.apply_outputs(hw, clock.now_ms());

        match &mut self.pipeline {
            Pipeline::Screening(_) => {
                if let Err(e) = hw.probe() {
                    error!("IR thermometer probe failed: {}", e);
                    return Err(Error::Init("IR thermometer not responding"));
                }
                info!("IR thermometer ready");
            }
            Pipeline::Radar(radar) => radar.home(hw, clock),
        }

        self.started = true;
        sink.emit(&AppEvent::Started(self.config.mode));
        info!("AppService started in {:?} mode", self.config.mode);
        Ok(())
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run every activity that is due, then apply output commands.
    /// Returns the number of activities run.
    pub fn poll(
        &mut self,
        hw: &mut impl StationHardware,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<usize> {
        if !self.started {
            warn!("AppService polled before start");
            return Ok(0);
        }

        let now = clock.now_ms();
        let due = self.scheduler.due(now);

        for activity in &due {
            self.ctx.total_ticks += 1;
            match (*activity, &mut self.pipeline) {
                (Activity::Screen, Pipeline::Screening(screening)) => {
                    screening.run(now, &self.ranger, &mut self.ctx, hw, clock, sink)?;
                }
                (Activity::Measure, Pipeline::Radar(radar)) => {
                    radar.measure(&self.ranger, hw, sink);
                }
                (Activity::Step, Pipeline::Radar(radar)) => radar.step(hw, clock),
                (other, _) => warn!("activity {:?} has no pipeline", other),
            }
        }

        self.apply_outputs(hw, clock.now_ms());
        Ok(due.len())
    }

    /// Milliseconds the caller may idle before the next poll has work.
    pub fn idle_ms(&self, clock: &impl Clock) -> u64 {
        let now = clock.now_ms();
        let next = self.scheduler.idle_ms(now);
        match self.tone_deadline_ms {
            Some(deadline) => next.min(deadline.saturating_sub(now)),
            None => next,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StationState {
        match &self.pipeline {
            Pipeline::Screening(s) => StationState::Screening(s.presence()),
            Pipeline::Radar(r) => StationState::Radar(r.mode()),
        }
    }

    /// Current servo angle (radar mode).
    pub fn angle(&self) -> Option<i16> {
        match &self.pipeline {
            Pipeline::Radar(r) => Some(r.angle()),
            Pipeline::Screening(_) => None,
        }
    }

    /// Whether a fever alert is latched (screening mode).
    pub fn alert_active(&self) -> bool {
        match &self.pipeline {
            Pipeline::Screening(s) => s.fever_monitor().alert_active(),
            Pipeline::Radar(_) => false,
        }
    }

    pub fn context(&self) -> &StationContext {
        &self.ctx
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Activities run since start.
    pub fn tick_count(&self) -> u64 {
        self.ctx.total_ticks
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate context commands into port calls.
    fn apply_outputs(&mut self, hw: &mut impl StationHardware, now_ms: u64) {
        let cmds = &mut self.ctx.commands;
        hw.set(OutputLine::Presence, cmds.presence);
        hw.set(OutputLine::Temperature, cmds.temperature);

        match core::mem::replace(&mut cmds.buzzer, BuzzerCommand::Unchanged) {
            BuzzerCommand::Sound {
                frequency_hz,
                length,
            } => {
                hw.tone(frequency_hz, length);
                self.tone_deadline_ms = match length {
                    ToneLength::Millis(ms) => Some(now_ms + u64::from(ms)),
                    ToneLength::Continuous => None,
                };
            }
            BuzzerCommand::Silence => {
                hw.silence();
                self.tone_deadline_ms = None;
            }
            BuzzerCommand::Unchanged => {
                if self.tone_deadline_ms.is_some_and(|deadline| now_ms >= deadline) {
                    hw.silence();
                    self.tone_deadline_ms = None;
                }
            }
        }
    }
}
