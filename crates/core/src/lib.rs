//! # Dunkstats Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the Twitch, token and Dunkbin adapters
//! - The chunk planner, retry policy and retrying fetcher
//! - The token store and single-flight token refresher
//! - The batch orchestrator and the profile-picture mapping service
//!
//! ## Architecture Principles
//! - Only depends on `dunkstats-common` and `dunkstats-domain`
//! - No HTTP, filesystem or environment access
//! - All external effects via traits, time via `Clock`

pub mod auth;
pub mod fetch;
pub mod mapping;
pub mod planner;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{CredentialSink, NoopCredentialSink, TokenEndpoint};
pub use auth::{TokenRefresher, TokenStore};
pub use fetch::ports::{SourceDirectory, UserLookup};
pub use fetch::{BatchOrchestrator, ResponseClassifier, RetryPolicy, RetryingFetcher};
pub use mapping::PfpMappingService;
pub use planner::{plan_chunks, ChunkPlan};
