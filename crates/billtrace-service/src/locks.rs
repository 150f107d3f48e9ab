//! Per-serial write serialization.
//!
//! The track workflow is check-then-append: read the last event, evaluate
//! the cooldown, append. Without serialization, two simultaneous requests
//! for the same bill can both observe "no recent event" and both be
//! accepted inside the window. Holding the serial's lock across the whole
//! sequence closes that race while leaving unrelated serials fully
//! concurrent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A map of per-serial async mutexes.
///
/// The map grows with the set of serial numbers seen since startup; each
/// entry is a single `Arc<Mutex<()>>`, so the footprint stays negligible
/// next to the tracking log itself.
#[derive(Clone, Default)]
pub struct SerialLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl SerialLocks {
    /// Create an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a serial number, waiting if another request
    /// for the same serial holds it.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub async fn acquire(&self, serial: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("serial lock registry poisoned");
            Arc::clone(
                map.entry(serial.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        lock.lock_owned().await
    }
}
