//! Peripheral drivers.
//!
//! Each driver is generic over the `embedded-hal` 1.0 traits and
//! implements one port trait, so the same code runs against ESP-IDF
//! peripherals on the target and against fakes in tests.
//!
//! | Driver       | Implements        | Peripheral                |
//! |--------------|-------------------|---------------------------|
//! | `ultrasonic` | PulseTrigger      | HC-SR04 (GPIO trig/echo)  |
//! | `mlx90614`   | TemperatureSource | MLX90614 (I²C / SMBus)    |
//! | `servo`      | AngleActuator     | Hobby servo (50 Hz PWM)   |
//! | `buzzer`     | Buzzer            | Passive piezo (PWM)       |
//! | `indicator`  | DigitalOutput     | Presence / temp-OK lines  |

pub mod buzzer;
pub mod indicator;
pub mod mlx90614;
pub mod servo;
pub mod ultrasonic;
