//! Screening pipeline: presence detection gating IR fever checks.
//!
//! ```text
//!  Ranger ─▶ PresenceDebouncer ──[sample?]──▶ ThermalSampler ─▶ FeverMonitor
//!                 │                                                 │
//!                 └───────────── OutputCommands ◀────────────────────┘
//! ```
//!
//! Distance is always sampled before temperature within a tick.

use embedded_hal::digital::PinState;

use super::events::{AppEvent, ScreeningReport, ScreeningStatus, TemperatureReport};
use super::ports::{Clock, EventSink, TemperatureSource, PulseTrigger};
use crate::config::{StationConfig, ThermalTrigger};
use crate::error::Result;
use crate::fsm::context::{BuzzerCommand, StationContext};
use crate::fsm::fever::FeverMonitor;
use crate::fsm::presence::{PresenceDebouncer, PresenceEdge, PresenceState};
use crate::sensors::ranger::Ranger;
use crate::sensors::thermal::ThermalSampler;

pub struct ScreeningPipeline {
    thermal: ThermalSampler,
    presence: PresenceDebouncer,
    fever: FeverMonitor,
    trigger: ThermalTrigger,
}

impl ScreeningPipeline {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            thermal: ThermalSampler::new(config.thermal.clone()),
            presence: PresenceDebouncer::new(&config.presence),
            fever: FeverMonitor::new(config.fever.clone()),
            trigger: config.presence.thermal_trigger,
        }
    }

    pub fn presence(&self) -> PresenceState {
        self.presence.state()
    }

    pub fn fever_monitor(&self) -> &FeverMonitor {
        &self.fever
    }

    /// One screening tick at `now_ms`.
    pub fn run(
        &mut self,
        now_ms: u64,
        ranger: &Ranger,
        ctx: &mut StationContext,
        hw: &mut (impl PulseTrigger + TemperatureSource),
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        // 1. Distance
        let reading = ranger.read(hw, clock)?;
        let distance = ranger.usable_distance(&reading);
        ctx.sensors.distance = Some(reading);
        let qualifies = self.presence.qualifies(distance);

        // 2. Presence
        let edge = self.presence.update(now_ms, distance);
        match edge {
            Some(PresenceEdge::Arrived) => sink.emit(&AppEvent::Presence(PresenceEdge::Arrived)),
            Some(PresenceEdge::Departed) => {
                self.fever.reset();
                ctx.clear_temperature();
                sink.emit(&AppEvent::Presence(PresenceEdge::Departed));
            }
            None => {}
        }
        ctx.commands.presence = if self.presence.is_present() {
            PinState::High
        } else {
            PinState::Low
        };

        // 3. Temperature, only for a present subject
        let sample_now = match self.trigger {
            ThermalTrigger::OnPresenceEdge => edge == Some(PresenceEdge::Arrived),
            ThermalTrigger::EveryQualifyingTick => qualifies && self.presence.is_present(),
        };
        let temperature = if sample_now {
            Some(self.check_temperature(ctx, hw, clock, sink)?)
        } else {
            TemperatureReport::from_snapshot(&ctx.sensors)
        };

        // 4. Report
        let status = match (self.presence.is_present(), self.fever.alert_active()) {
            (false, _) => ScreeningStatus::Waiting,
            (true, false) => ScreeningStatus::PresentNormal,
            (true, true) => ScreeningStatus::PresentFever,
        };
        sink.emit(&AppEvent::Screening(ScreeningReport {
            distance_cm: distance,
            valid_samples: reading.valid_count,
            requested_samples: reading.requested_count,
            presence: self.presence.state(),
            temperature,
            temperature_sampled: sample_now,
            status,
        }));
        Ok(())
    }

    fn check_temperature(
        &mut self,
        ctx: &mut StationContext,
        hw: &mut impl TemperatureSource,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<TemperatureReport> {
        let temp = self.thermal.read(hw, clock)?;
        let ambient_c = self.thermal.ambient(hw);
        let verdict = self.fever.evaluate(&temp);

        ctx.sensors.object_temp = Some(temp);
        ctx.sensors.ambient_c = ambient_c;
        ctx.sensors.fever_class = Some(verdict.class);
        ctx.commands.temperature = verdict.indicator;
        ctx.commands.buzzer = if verdict.sound_alert {
            let cfg = self.fever.config();
            BuzzerCommand::Sound {
                frequency_hz: cfg.alert_hz,
                length: cfg.alert_length,
            }
        } else {
            BuzzerCommand::Silence
        };
        if verdict.newly_febrile {
            sink.emit(&AppEvent::FeverAlert {
                temperature_c: temp.value,
            });
        }

        Ok(TemperatureReport {
            object_c: temp.is_valid().then_some(temp.value),
            ambient_c,
            class: verdict.class,
        })
    }
}
