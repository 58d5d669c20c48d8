//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ranger, thermometer, servo, buzzer, indicator pins,
//! clock, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly and every state
//! machine runs on the host against mocks and a fake clock.

use embedded_hal::digital::PinState;

use crate::config::ToneLength;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Fires an ultrasonic ping and times the echo.
pub trait PulseTrigger {
    /// Round-trip echo width in microseconds, or `None` if no echo
    /// completed within `timeout_us`.  Blocks for at most the timeout.
    fn measure(&mut self, timeout_us: u32) -> Option<u32>;
}

/// Contactless IR thermometer.
pub trait TemperatureSource {
    /// Check the sensor answers.  Called once at start-up.
    fn probe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    /// Object temperature in °C.  NaN when the sensor could not produce
    /// a reading.
    fn read_object_c(&mut self) -> f32;

    /// Die (ambient) temperature in °C.  NaN on failure.
    fn read_ambient_c(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Positional servo.
pub trait AngleActuator {
    fn set_angle(&mut self, degrees: i16);
}

/// Discrete indicator lines consumed by the downstream logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLine {
    /// HIGH while a subject is present.
    Presence,
    /// HIGH when the last temperature was normal.
    Temperature,
}

pub trait DigitalOutput {
    fn set(&mut self, line: OutputLine, level: PinState);
}

/// Tone generator.  Timed tones are ended by the control loop calling
/// [`silence`](Buzzer::silence) once the length has elapsed.
pub trait Buzzer {
    fn tone(&mut self, frequency_hz: u32, length: ToneLength);
    fn silence(&mut self);
}

/// Everything the control loop drives, as one bound.
pub trait StationHardware:
    PulseTrigger + TemperatureSource + AngleActuator + DigitalOutput + Buzzer
{
}

impl<T> StationHardware for T where
    T: PulseTrigger + TemperatureSource + AngleActuator + DigitalOutput + Buzzer
{
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock with a blocking wait.
pub trait Clock {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block the (only) thread of control for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
