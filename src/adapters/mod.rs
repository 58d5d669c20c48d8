//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                    |
//! |------------|-------------------|--------------------------------|
//! | `hardware` | StationHardware   | Drivers in [`crate::drivers`]  |
//! | `log_sink` | EventSink         | Serial log output              |
//! | `time`     | Clock             | ESP32 system timer / FreeRTOS  |

pub mod hardware;
pub mod log_sink;
pub mod time;
