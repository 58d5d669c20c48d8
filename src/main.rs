//! RangeWatch firmware entry point.
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter              LogEventSink     Esp32Time       │
//! │  (HC-SR04 · MLX90614 · Servo  (EventSink)      (Clock)         │
//! │   Buzzer · Indicator pins)                                     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Ranger · Presence · Fever · Scan/Hold                 │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (per-activity watermarks)                           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use rangewatch::adapters::hardware::HardwareAdapter;
use rangewatch::adapters::log_sink::LogEventSink;
use rangewatch::adapters::time::Esp32TimeAdapter;
use rangewatch::app::ports::Clock;
use rangewatch::app::service::AppService;
use rangewatch::config::StationConfig;
use rangewatch::drivers::buzzer::PwmBuzzer;
use rangewatch::drivers::indicator::IndicatorPins;
use rangewatch::drivers::mlx90614::Mlx90614;
use rangewatch::drivers::servo::Servo;
use rangewatch::drivers::ultrasonic::Hcsr04;
use rangewatch::pins;

/// Build-time override: a full JSON `StationConfig`, or a preset name.
fn load_config() -> StationConfig {
    if let Some(json) = option_env!("RANGEWATCH_CONFIG") {
        match StationConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config: RANGEWATCH_CONFIG override");
                return cfg;
            }
            Err(e) => warn!("RANGEWATCH_CONFIG rejected ({}), ignoring", e),
        }
    }
    if let Some(name) = option_env!("RANGEWATCH_MODE") {
        match StationConfig::preset(name) {
            Some(cfg) => {
                info!("Config: preset '{}'", name);
                return cfg;
            }
            None => warn!("Unknown preset '{}', using defaults", name),
        }
    }
    StationConfig::default()
}

/// Park the task forever; the task watchdog resets the chip.
fn halt(reason: &str) -> ! {
    error!("{}, halting", reason);
    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(1000);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RangeWatch v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    let mut app = match AppService::new(config) {
        Ok(app) => app,
        Err(e) => halt(&format!("invalid configuration: {}", e)),
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    // SAFETY: pin numbers come from `pins`, each claimed exactly once.
    let (trig, echo, presence, temp_ok, sda, scl, servo_pin, buzzer_pin) = unsafe {
        (
            AnyOutputPin::new(pins::ULTRASONIC_TRIG_GPIO),
            AnyInputPin::new(pins::ULTRASONIC_ECHO_GPIO),
            AnyOutputPin::new(pins::PRESENCE_GPIO),
            AnyOutputPin::new(pins::TEMPERATURE_OK_GPIO),
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
            AnyOutputPin::new(pins::SERVO_GPIO),
            AnyOutputPin::new(pins::BUZZER_GPIO),
        )
    };

    let ranger = Hcsr04::new(
        PinDriver::output(trig)?,
        PinDriver::input(echo)?,
        Ets,
        // SAFETY: esp_timer_get_time reads a free-running hardware counter.
        || (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64,
    );

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;
    let thermometer = Mlx90614::new(i2c);

    let servo_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new()
            .frequency(Hertz(pins::SERVO_PWM_FREQ_HZ))
            .resolution(Resolution::Bits14),
    )?;
    let servo = Servo::new(LedcDriver::new(
        peripherals.ledc.channel0,
        &servo_timer,
        servo_pin,
    )?);

    let buzzer_timer = LedcTimerDriver::new(
        peripherals.ledc.timer1,
        &TimerConfig::new()
            .frequency(Hertz(pins::BUZZER_PWM_FREQ_HZ))
            .resolution(Resolution::Bits10),
    )?;
    let buzzer = PwmBuzzer::new(
        LedcDriver::new(peripherals.ledc.channel1, &buzzer_timer, buzzer_pin)?,
        pins::BUZZER_PWM_FREQ_HZ,
    );

    let outputs = IndicatorPins::new(PinDriver::output(presence)?, PinDriver::output(temp_ok)?);

    let mut hw = HardwareAdapter::new(ranger, thermometer, servo, buzzer, outputs);
    let mut clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    // ── 4. Start-up ───────────────────────────────────────────
    if let Err(e) = app.start(&mut hw, &mut clock, &mut log_sink) {
        halt(&format!("start-up failed: {}", e));
    }

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        if let Err(e) = app.poll(&mut hw, &mut clock, &mut log_sink) {
            warn!("Control loop: {}", e);
        }

        let idle = app.idle_ms(&clock);
        if idle > 0 {
            clock.sleep_ms(idle.min(u64::from(u32::MAX)) as u32);
        }
    }
}
