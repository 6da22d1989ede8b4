//! Serializes user operations against one feature controller.
//!
//! Every operation takes the controller for its whole duration, including the
//! awaits on the browser or the store, so a second click can never observe
//! a half-applied first one. Waiters are served in arrival order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

pub struct OperationQueue<T> {
    inner: Arc<Mutex<T>>,
    pending: Arc<AtomicUsize>,
}

impl<T> Clone for OperationQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T: Send> OperationQueue<T> {
    pub fn new(controller: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Operations queued or running.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Waits for exclusive access. The operation counts as pending until the
    /// returned guard is dropped.
    pub async fn enter(&self) -> QueueGuard<'_, T> {
        let queued = self.pending.fetch_add(1, Ordering::SeqCst);
        trace!(queued, "operation waiting");
        let guard = self.inner.lock().await;
        QueueGuard {
            guard,
            pending: &self.pending,
        }
    }
}

pub struct QueueGuard<'q, T> {
    guard: MutexGuard<'q, T>,
    pending: &'q AtomicUsize,
}

impl<T> std::ops::Deref for QueueGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> std::ops::DerefMut for QueueGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for QueueGuard<'_, T> {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}
