//! Time abstraction for testability
//!
//! Retry loops sleep through a [`Clock`] so tests can observe requested
//! delays without waiting for them.

pub mod clock;

pub use clock::{Clock, SystemClock};
