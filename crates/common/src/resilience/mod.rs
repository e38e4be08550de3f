//! Resilience patterns for transient failures
//!
//! Only the delay arithmetic lives here; deciding *whether* to retry is
//! domain policy and belongs to the caller (see `dunkstats-core`).

pub mod backoff;

pub use backoff::BackoffStrategy;
