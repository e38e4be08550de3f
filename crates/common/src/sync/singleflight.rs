//! Single-flight execution
//!
//! Collapses concurrent requests for the same operation into one underlying
//! future. The first caller starts the operation; every caller that arrives
//! while it is pending awaits the same shared handle and observes the same
//! result. Once the operation completes the slot is cleared and the next
//! caller starts a fresh flight.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::debug;

type Flight<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

struct Slot<T, E> {
    generation: u64,
    current: Option<(u64, Flight<T, E>)>,
}

/// Shared-future guard around one logical operation.
///
/// The internal lock is only held to read or swap the slot, never across an
/// await point.
pub struct SingleFlight<T, E> {
    slot: Mutex<Slot<T, E>>,
}

impl<T, E> Default for SingleFlight<T, E> {
    fn default() -> Self {
        Self { slot: Mutex::new(Slot { generation: 0, current: None }) }
    }
}

impl<T, E> std::fmt::Debug for SingleFlight<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("SingleFlight")
            .field("generation", &slot.generation)
            .field("in_flight", &slot.current.is_some())
            .finish()
    }
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create an idle single-flight guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `start` unless an operation is already pending, in which case
    /// join it.
    ///
    /// `start` is only invoked by the caller that opens a new flight.
    pub async fn run<F, Fut>(&self, start: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (id, flight) = {
            let mut slot = self.slot.lock();
            if let Some((id, flight)) = slot.current.as_ref() {
                debug!(flight = *id, "joining in-flight operation");
                (*id, flight.clone())
            } else {
                slot.generation += 1;
                let id = slot.generation;
                let flight = start().boxed().shared();
                slot.current = Some((id, flight.clone()));
                (id, flight)
            }
        };

        let result = flight.await;

        let mut slot = self.slot.lock();
        if slot.current.as_ref().is_some_and(|(current, _)| *current == id) {
            slot.current = None;
        }
        result
    }

    /// Whether an operation is currently pending.
    pub fn in_flight(&self) -> bool {
        self.slot.lock().current.is_some()
    }

    /// Number of flights started so far.
    pub fn flights_started(&self) -> u64 {
        self.slot.lock().generation
    }
}
