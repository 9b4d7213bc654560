use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// FIFO async lock. `acquire` resolves once every earlier caller has released.
///
/// There is no timeout: a handle that is never released starves every later caller.
/// Handles release on drop, so an early return or `?` can't leak the lock.
#[derive(Clone, Default)]
pub struct MutexQueue {
    holder: Arc<Mutex<()>>,
}

#[must_use = "the lock is released as soon as the handle is dropped"]
pub struct ReleaseHandle {
    _guard: OwnedMutexGuard<()>,
}

impl MutexQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> ReleaseHandle {
        // tokio's Mutex hands out the lock in the order lock() was first polled
        ReleaseHandle {
            _guard: Arc::clone(&self.holder).lock_owned().await,
        }
    }

    pub fn is_held(&self) -> bool {
        self.holder.try_lock().is_err()
    }
}

impl ReleaseHandle {
    pub fn release(self) {}
}
