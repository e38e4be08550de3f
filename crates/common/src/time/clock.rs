//! Clock trait and the tokio-backed implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Source of monotonic time and of cooperative waits.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant (monotonic time).
    fn now(&self) -> Instant;

    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Implement Clock for `Arc<T>` so a clock can be shared with test assertions
#[async_trait]
impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}
