//! Motion control helpers.

pub mod sweep;
