//! # Dunkstats Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client and response classification
//! - Twitch adapters (Helix user lookup, OAuth token endpoint)
//! - Dunkbin users export adapter
//! - Configuration loading (`.env`, environment, TOML/JSON files)
//! - `.env` credential persistence and the mapping artifact writer
//!
//! ## Architecture
//! - Implements traits defined in `dunkstats-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod dunkbin;
pub mod errors;
pub mod http;
pub mod output;
pub mod persistence;
pub mod twitch;

// Re-export commonly used items
pub use dunkbin::DunkbinClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use output::MappingWriter;
pub use persistence::EnvFileCredentialSink;
pub use twitch::{HelixUserClient, TwitchTokenClient};
