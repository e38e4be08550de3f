//! # Dunkstats Domain
//!
//! Domain types shared by every Dunkstats crate.
//!
//! This crate contains:
//! - Credentials and the records exchanged with Twitch and Dunkbin
//! - Fetch outcomes, retry decisions and fetch reports
//! - The profile-picture mapping artifact
//! - Configuration structures and the domain error type
//!
//! ## Architecture
//! - No dependencies on other Dunkstats crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
