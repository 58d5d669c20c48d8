//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control-loop rules for the station: the
//! screening pipeline (presence debouncing gating fever checks), the
//! radar pipeline (sweep with scan/hold), and the service that
//! schedules them.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod radar;
pub mod screening;
pub mod service;
