//! Station configuration parameters
//!
//! All tunable parameters for the RangeWatch station, grouped per
//! component.  The four presets reproduce the field-tested sketch
//! behaviours as configuration of one shared core.
//! Values can be overridden at build time with a JSON document.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which control pipeline the station runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationMode {
    /// Presence detection followed by IR fever screening.
    Screening,
    /// Servo sweep radar with scan/hold.
    Radar,
}

// ---------------------------------------------------------------------------
// Ranger
// ---------------------------------------------------------------------------

/// Conversion from round-trip echo time to distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeedOfSound {
    /// Half the round trip at the given speed, in cm/µs (0.0343 ≈ 343 m/s).
    CmPerMicro(f32),
    /// Divide the round trip by a fixed constant (58.0 ≈ 345 m/s).
    Divisor(f32),
}

impl SpeedOfSound {
    /// 343 m/s, dry air at 20 °C.
    pub const NOMINAL: Self = Self::CmPerMicro(0.0343);
    /// The `duration / 58` rule of thumb.
    pub const LEGACY: Self = Self::Divisor(58.0);

    /// Distance in centimetres for a round-trip echo of `duration_us`.
    pub fn distance_cm(self, duration_us: u32) -> f32 {
        match self {
            Self::CmPerMicro(cm_per_us) => duration_us as f32 * cm_per_us / 2.0,
            Self::Divisor(divisor) => duration_us as f32 / divisor,
        }
    }

    fn is_positive(self) -> bool {
        match self {
            Self::CmPerMicro(v) | Self::Divisor(v) => v.is_finite() && v > 0.0,
        }
    }
}

/// How rejected samples enter an average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InvalidPolicy {
    /// Drop rejected samples from both the sum and the count.
    Exclude,
    /// Add `penalty` in place of each rejected sample; always divide by
    /// the requested count.  Biases the mean upward.
    Penalize { penalty: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangerConfig {
    /// Echo samples averaged per reading.
    pub samples: u8,
    /// Bounded wait for each echo (µs).
    pub timeout_us: u32,
    /// Smallest plausible distance (cm, inclusive).
    pub min_plausible_cm: f32,
    /// Largest plausible distance (cm, inclusive).  Averages at or above
    /// this value are never used for decisions.
    pub max_plausible_cm: f32,
    pub speed: SpeedOfSound,
    pub policy: InvalidPolicy,
    /// Value reported when every sample was rejected.
    pub no_reading_cm: f32,
    /// Pause between consecutive pings (ms).
    pub settle_ms: u32,
}

// ---------------------------------------------------------------------------
// Thermal
// ---------------------------------------------------------------------------

/// Treatment of unreadable IR samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NanPolicy {
    /// Drop NaN and out-of-range samples.
    Exclude,
    /// Count NaN as 0 °C and skip the range check.
    Zero,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalConfig {
    /// Object-temperature samples averaged per reading.
    pub samples: u8,
    /// Lowest plausible object temperature (°C, inclusive).
    pub min_plausible_c: f32,
    /// Highest plausible object temperature (°C, inclusive).
    pub max_plausible_c: f32,
    pub policy: NanPolicy,
    /// Pause between IR reads (ms).
    pub settle_ms: u32,
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// When the IR thermometer is sampled while someone is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThermalTrigger {
    /// Once, on the Absent → Present edge.
    OnPresenceEdge,
    /// On every tick with a qualifying distance.
    EveryQualifyingTick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Readings at or below this distance count as presence (cm).
    pub threshold_cm: f32,
    /// Absence after this long without a qualifying reading (ms).
    pub timeout_ms: u32,
    /// Screening tick period (ms).
    pub loop_interval_ms: u32,
    pub thermal_trigger: ThermalTrigger,
}

// ---------------------------------------------------------------------------
// Fever
// ---------------------------------------------------------------------------

/// Length of the alert tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToneLength {
    Millis(u32),
    Continuous,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeverConfig {
    /// Below this the reading is background, not skin (°C).
    pub min_plausible_c: f32,
    /// At or above this the subject is febrile (°C).
    pub fever_threshold_c: f32,
    /// Alert tone frequency (Hz).  349 Hz is F4.
    pub alert_hz: u32,
    pub alert_length: ToneLength,
}

// ---------------------------------------------------------------------------
// Scan / hold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub min_angle: i16,
    pub max_angle: i16,
    /// Degrees per sweep step.
    pub step_degrees: i16,
    /// Period between sweep steps (ms).
    pub step_delay_ms: u32,
    /// Pause after each servo write so the horn can move (ms).
    pub servo_settle_ms: u32,
    /// Period between distance measurements (ms).
    pub measure_interval_ms: u32,
    /// Bounded wait for each radar echo (µs).
    pub pulse_timeout_us: u32,
    /// Objects at or below this distance stop the sweep (cm).
    pub detect_threshold_cm: f32,
    /// Consecutive detections needed to enter hold.
    pub detect_confirm: u8,
    /// Consecutive clear readings needed to leave hold.
    pub no_detect_confirm: u8,
    /// When false the radar sweeps forever and only traces.
    pub hold_enabled: bool,
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// Complete station configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub mode: StationMode,
    pub ranger: RangerConfig,
    pub thermal: ThermalConfig,
    pub presence: PresenceConfig,
    pub fever: FeverConfig,
    pub scan: ScanConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            mode: StationMode::Screening,
            ranger: RangerConfig {
                samples: 3,
                timeout_us: 30_000, // ~5 m round trip
                min_plausible_cm: 2.0,
                max_plausible_cm: 400.0,
                speed: SpeedOfSound::NOMINAL,
                policy: InvalidPolicy::Exclude,
                no_reading_cm: 999.9,
                settle_ms: 10,
            },
            thermal: ThermalConfig {
                samples: 3,
                min_plausible_c: 20.0,
                max_plausible_c: 100.0,
                policy: NanPolicy::Exclude,
                settle_ms: 50,
            },
            presence: PresenceConfig {
                threshold_cm: 15.0,
                timeout_ms: 3000,
                loop_interval_ms: 200,
                thermal_trigger: ThermalTrigger::OnPresenceEdge,
            },
            fever: FeverConfig {
                min_plausible_c: 20.0,
                fever_threshold_c: 37.5,
                alert_hz: crate::pins::BUZZER_PWM_FREQ_HZ,
                alert_length: ToneLength::Millis(500),
            },
            scan: ScanConfig {
                min_angle: 15,
                max_angle: 165,
                step_degrees: 4,
                step_delay_ms: 25,
                servo_settle_ms: 6,
                measure_interval_ms: 60,
                pulse_timeout_us: 15_000, // ~2.5 m
                detect_threshold_cm: 10.0,
                detect_confirm: 3,
                no_detect_confirm: 5,
                hold_enabled: true,
            },
        }
    }
}

impl StationConfig {
    /// Screening that re-reads the thermometer on every qualifying tick.
    pub fn screening() -> Self {
        let mut c = Self::default();
        c.presence.thermal_trigger = ThermalTrigger::EveryQualifyingTick;
        c
    }

    /// First-generation screening: penalty averaging, `duration / 58`,
    /// NaN read as 0 °C, 30 °C threshold, continuous alert, and presence
    /// that follows the latest reading with no hold-over.
    pub fn legacy_screening() -> Self {
        let mut c = Self::screening();
        c.ranger.samples = 5;
        c.ranger.speed = SpeedOfSound::LEGACY;
        // Timeouts were scored as 50 cm; distances were never range-checked.
        c.ranger.policy = InvalidPolicy::Penalize { penalty: 50.0 };
        c.ranger.min_plausible_cm = 0.0;
        c.ranger.max_plausible_cm = 1000.0;
        c.thermal.samples = 5;
        c.thermal.policy = NanPolicy::Zero;
        c.presence.timeout_ms = 0;
        c.presence.loop_interval_ms = 500;
        c.fever.min_plausible_c = -70.0; // sensor floor: never indeterminate
        c.fever.fever_threshold_c = 30.0;
        c.fever.alert_length = ToneLength::Continuous;
        c
    }

    /// Sweep radar that halts on a confirmed near object.
    pub fn radar_hold() -> Self {
        Self {
            mode: StationMode::Radar,
            ..Self::default()
        }
    }

    /// Slow 1° sweep that measures once per step and never holds.
    pub fn radar_trace() -> Self {
        let mut c = Self::radar_hold();
        c.scan.step_degrees = 1;
        c.scan.step_delay_ms = 40;
        c.scan.measure_interval_ms = 40;
        c.scan.servo_settle_ms = 0;
        c.scan.pulse_timeout_us = 25_000; // ~4 m
        c.scan.hold_enabled = false;
        c
    }

    /// Look up a preset by name (`RANGEWATCH_MODE`).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "screening" => Some(Self::screening()),
            "legacy-screening" => Some(Self::legacy_screening()),
            "radar-hold" => Some(Self::radar_hold()),
            "radar-trace" => Some(Self::radar_trace()),
            _ => None,
        }
    }

    /// Parse and validate a JSON override.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control loop cannot run with.  Values are never
    /// clamped silently.
    pub fn validate(&self) -> Result<()> {
        let r = &self.ranger;
        if r.samples == 0 {
            return Err(Error::Config("ranger.samples must be positive"));
        }
        if r.timeout_us == 0 {
            return Err(Error::Config("ranger.timeout_us must be positive"));
        }
        if !(r.min_plausible_cm < r.max_plausible_cm) {
            return Err(Error::Config("ranger plausible range is empty"));
        }
        if !r.speed.is_positive() {
            return Err(Error::Config("ranger.speed must be positive"));
        }
        if r.no_reading_cm.is_nan() {
            return Err(Error::Config("ranger.no_reading_cm must be a number"));
        }

        let t = &self.thermal;
        if t.samples == 0 {
            return Err(Error::Config("thermal.samples must be positive"));
        }
        if !(t.min_plausible_c < t.max_plausible_c) {
            return Err(Error::Config("thermal plausible range is empty"));
        }

        let p = &self.presence;
        if !(p.threshold_cm > 0.0) {
            return Err(Error::Config("presence.threshold_cm must be positive"));
        }
        if p.loop_interval_ms == 0 {
            return Err(Error::Config("presence.loop_interval_ms must be positive"));
        }

        let f = &self.fever;
        if !(f.min_plausible_c < f.fever_threshold_c) {
            return Err(Error::Config("fever threshold must exceed plausible floor"));
        }

        let s = &self.scan;
        if s.min_angle >= s.max_angle {
            return Err(Error::Config("scan.min_angle must be below max_angle"));
        }
        if !(0..=180).contains(&s.min_angle) || !(0..=180).contains(&s.max_angle) {
            return Err(Error::Config("scan angles must lie within 0..=180"));
        }
        if s.step_degrees <= 0 {
            return Err(Error::Config("scan.step_degrees must be positive"));
        }
        if s.step_delay_ms == 0 || s.measure_interval_ms == 0 {
            return Err(Error::Config("scan periods must be positive"));
        }
        if s.pulse_timeout_us == 0 {
            return Err(Error::Config("scan.pulse_timeout_us must be positive"));
        }
        if s.detect_confirm == 0 || s.no_detect_confirm == 0 {
            return Err(Error::Config("scan confirm counts must be positive"));
        }
        Ok(())
    }
}
