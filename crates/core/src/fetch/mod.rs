//! Batch fetch pipeline
//!
//! - [`policy`]: pure decision function from outcome to next action
//! - [`fetcher`]: effectful retry driver (waits, refreshes, gives up)
//! - [`orchestrator`]: sequential chunk processing with partial failures

pub mod fetcher;
pub mod orchestrator;
pub mod policy;
pub mod ports;

pub use fetcher::RetryingFetcher;
pub use orchestrator::BatchOrchestrator;
pub use policy::{ResponseClassifier, RetryPolicy};
pub use ports::{SourceDirectory, UserLookup};
