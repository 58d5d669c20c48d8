//! RangeWatch firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host-side
//! simulation.  Drivers are generic over `embedded-hal` traits; the
//! ESP-IDF bindings are only pulled in by the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod scheduler;
pub mod sensors;
