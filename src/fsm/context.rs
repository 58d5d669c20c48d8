//! Shared per-tick context of the control loop.
//!
//! `StationContext` holds the latest readings and the output commands the
//! state machines requested.  The service applies the commands to the
//! hardware after each activity, so decision code never calls a driver.

use embedded_hal::digital::PinState;

use crate::config::ToneLength;
use crate::fsm::fever::FeverClass;
use crate::sensors::AveragedReading;

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// Latest readings.  Temperature fields keep their last value until the
/// subject leaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Last averaged distance pass.
    pub distance: Option<AveragedReading>,
    /// Last averaged object-temperature pass.
    pub object_temp: Option<AveragedReading>,
    /// Ambient temperature read alongside `object_temp`.
    pub ambient_c: Option<f32>,
    /// Class of `object_temp`.
    pub fever_class: Option<FeverClass>,
}

// ---------------------------------------------------------------------------
// Output commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCommand {
    /// Leave the buzzer as it is.
    Unchanged,
    Sound { frequency_hz: u32, length: ToneLength },
    Silence,
}

/// Commands written by the state logic, applied by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputCommands {
    pub presence: PinState,
    pub temperature: PinState,
    /// One-shot; reset to `Unchanged` once applied.
    pub buzzer: BuzzerCommand,
}

impl Default for OutputCommands {
    fn default() -> Self {
        Self::all_off()
    }
}

impl OutputCommands {
    /// Both lines LOW, buzzer silenced. Power-up state.
    pub fn all_off() -> Self {
        Self {
            presence: PinState::Low,
            temperature: PinState::Low,
            buzzer: BuzzerCommand::Silence,
        }
    }
}

// ---------------------------------------------------------------------------
// StationContext
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StationContext {
    /// Activities run since start.
    pub total_ticks: u64,
    pub sensors: SensorSnapshot,
    pub commands: OutputCommands,
}

impl StationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the temperature state and lower the temperature line.
    pub fn clear_temperature(&mut self) {
        self.sensors.object_temp = None;
        self.sensors.ambient_c = None;
        self.sensors.fever_class = None;
        self.commands.temperature = PinState::Low;
        self.commands.buzzer = BuzzerCommand::Silence;
    }
}
