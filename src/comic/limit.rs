// Admission gate for in-flight fetches.
// A counting semaphore: at most `capacity` holders at once, no waiter ordering.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default cap on simultaneous fetches.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 30;

/// Counting gate bounding how many fetches run at once.
///
/// Clones share the same slot pool.
#[derive(Debug, Clone)]
pub struct FetchGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// An admitted slot. Dropping it returns the slot, so every exit path
/// releases.
#[derive(Debug)]
pub struct FetchPermit {
    _permit: OwnedSemaphorePermit,
}

impl FetchGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Wait until fewer than `capacity` holders are admitted, then admit.
    pub async fn admit(&self) -> FetchPermit {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("gate semaphore is never closed");
        FetchPermit { _permit: permit }
    }
}

impl Default for FetchGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IN_FLIGHT)
    }
}
