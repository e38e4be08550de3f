//! # Dunkstats CLI
//!
//! Command-line entry point that wires the infrastructure adapters into the
//! core services and writes the profile-picture mapping artifact.

pub mod args;
pub mod context;
pub mod logging;

pub use args::Args;
pub use context::AppContext;
