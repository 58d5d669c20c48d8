//! GPIO / peripheral pin assignments for the RangeWatch station board
//! (ESP32-S3).
//!
//! GPIO 6, 7 and 10 are free on the S3 but wired to SPI flash on a classic
//! ESP32 (WROOM/WROVER); remap them before building for that chip.
//!
//! Single source of truth: `main` builds every driver from these numbers.
//! One board carries both the screening and the radar peripherals; the
//! configured mode decides which of them the control loop drives.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a ping.
pub const ULTRASONIC_TRIG_GPIO: i32 = 7;
/// Digital input: HIGH for the round-trip time of the echo.
/// Needs a 5 V → 3.3 V divider on ESP32.
pub const ULTRASONIC_ECHO_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Indicator outputs (read by the downstream 7408 AND-gate logic)
// ---------------------------------------------------------------------------

/// HIGH while a subject is present.
pub const PRESENCE_GPIO: i32 = 8;
/// HIGH for a normal temperature, LOW for fever or no valid reading.
pub const TEMPERATURE_OK_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Buzzer / servo (LEDC PWM)
// ---------------------------------------------------------------------------

/// Passive piezo buzzer.
pub const BUZZER_GPIO: i32 = 10;
/// Pan servo signal line.
pub const SERVO_GPIO: i32 = 12;

/// Hobby servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// Buzzer LEDC timer frequency, the alert note (F4).
pub const BUZZER_PWM_FREQ_HZ: u32 = 349;

// ---------------------------------------------------------------------------
// I²C bus (MLX90614 IR thermometer)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 4;
pub const I2C_SCL_GPIO: i32 = 5;
/// SMBus clock for the MLX90614 (max 100 kHz).
pub const I2C_BAUD_HZ: u32 = 100_000;
