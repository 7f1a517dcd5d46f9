//! Connection admission control.
//!
//! The accept loop takes an [`AdmissionPermit`] *before* calling `accept`, so
//! with every permit held, further clients wait in the kernel backlog rather
//! than being accepted and stalled. The permit moves into the session task and
//! is returned when the session ends, on every exit path.

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Bounds the number of concurrently open sessions.
#[derive(Debug, Clone)]
pub struct Admission {
    permits: Option<Arc<Semaphore>>,
}

/// Proof that a session may run. Dropping it releases the slot.
#[derive(Debug)]
#[must_use = "dropping the permit immediately releases the slot"]
pub struct AdmissionPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl Admission {
    /// `None` or `Some(0)` admits every connection.
    pub fn new(max_connections: Option<usize>) -> Self {
        Self {
            permits: max_connections
                .filter(|&n| n > 0)
                .map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Waits for a free slot. Returns immediately when unlimited.
    ///
    /// # Errors
    ///
    /// Fails only if the semaphore has been closed by [`Admission::close`].
    pub async fn acquire(&self) -> Result<AdmissionPermit, AcquireError> {
        let permit = match &self.permits {
            Some(sem) => Some(Arc::clone(sem).acquire_owned().await?),
            None => None,
        };
        Ok(AdmissionPermit { _permit: permit })
    }

    /// Free slots, or `None` when unlimited.
    pub fn available(&self) -> Option<usize> {
        self.permits.as_ref().map(|sem| sem.available_permits())
    }

    /// Wakes every waiter with an error; used on shutdown.
    pub fn close(&self) {
        if let Some(sem) = &self.permits {
            sem.close();
        }
    }
}
