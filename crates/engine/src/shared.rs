//! Cross-thread buffer handle
//!
//! Buffers are single-threaded objects. [`SharedBuffer`] serializes access
//! from several threads behind one lock: a caller holds the lock for the whole
//! write/read and every automation it fires.

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A buffer behind `Arc<Mutex<_>>`
#[derive(Debug)]
pub struct SharedBuffer<B> {
    inner: Arc<Mutex<B>>,
}

impl<B> SharedBuffer<B> {
    /// Take ownership of `buffer`
    pub fn new(buffer: B) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Block until the buffer is available
    pub fn lock(&self) -> MutexGuard<'_, B> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access
    pub fn with<T>(&self, f: impl FnOnce(&mut B) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Number of handles to this buffer
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<B> Clone for SharedBuffer<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
