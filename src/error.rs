//! Unified error types for the RangeWatch firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! control loop handles failures uniformly.  All variants are `Copy`.
//!
//! Only configuration and start-up failures are ever returned from the
//! control loop.  Echo timeouts and implausible readings are absorbed by
//! the samplers and show up as a zero `valid_count` instead.
//! [`SensorError`] and [`ActuatorError`] stay local to the sampler and
//! driver layers, which log them and carry on.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Failures the control loop returns to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required peripheral failed to initialise.  Fatal.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Echo (or another bounded wait) did not complete in time.
    Timeout,
    /// Reading is outside the physically plausible range.
    Implausible,
    /// Every sample of an averaging pass was rejected.
    AllSamplesInvalid,
    /// Bus transaction failed or returned a corrupt frame.
    Bus,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Implausible => write!(f, "reading out of plausible range"),
            Self::AllSamplesInvalid => write!(f, "no valid samples"),
            Self::Bus => write!(f, "bus error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
