//! Debouncing state machines.
//!
//! Each machine turns a stream of noisy readings into a discrete,
//! hysteretic state and reports every transition exactly once:
//!
//! | Machine                  | States              | Entry             | Exit                   |
//! |--------------------------|---------------------|-------------------|------------------------|
//! | `PresenceDebouncer`      | Absent / Present    | one reading       | timeout since last hit |
//! | `ScanHoldController`     | Sweeping / Holding  | N consecutive     | M consecutive clear    |
//! | `FeverMonitor`           | Normal / Fever / ?  | per evaluation    | per evaluation         |
//!
//! None of them read the clock or touch hardware; time and readings are
//! passed in, which keeps them deterministic under test.

pub mod context;
pub mod fever;
pub mod presence;
pub mod scan;
