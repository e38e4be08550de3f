//! Testing utilities and helpers
//!
//! - **[`time`]**: deterministic [`MockClock`] that records requested sleeps
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use dunkstats_common::testing::MockClock;
//! use dunkstats_common::Clock;
//!
//! # async fn example() {
//! let clock = MockClock::new();
//! clock.sleep(Duration::from_secs(60)).await; // returns immediately
//! assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
//! # }
//! ```

pub mod time;

pub use time::MockClock;
