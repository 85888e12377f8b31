// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Scoped storage lock.
//!
//! [`StorageGuard`] holds a texture's storage lock from construction until it
//! is dropped or explicitly released, whichever comes first.  Release happens
//! exactly once on every path, including early returns from `?`.

use crate::texture::{LockHandle, TextureResource};
use std::fmt::{Debug, Formatter};

/// Guard holding a texture's storage lock.
///
/// The guard is neither `Clone` nor `Copy`, so a lock cannot be released twice
/// through it.
pub struct StorageGuard<'t, T: TextureResource + ?Sized> {
    texture: &'t T,
    handle: Option<LockHandle>,
}

impl<'t, T: TextureResource + ?Sized> StorageGuard<'t, T> {
    /// Acquires the storage lock of `texture`.
    pub fn acquire(texture: &'t T) -> Self {
        let handle = texture.acquire_lock();
        logwise::trace_sync!("StorageGuard acquired lock {id}", id = handle.id());
        Self {
            texture,
            handle: Some(handle),
        }
    }

    /// The texture this guard locks.
    #[inline]
    pub fn texture(&self) -> &'t T {
        self.texture
    }

    /// Releases the lock now instead of at end of scope.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            logwise::trace_sync!("StorageGuard releasing lock {id}", id = handle.id());
            self.texture.release_lock(handle);
        }
    }
}

impl<T: TextureResource + ?Sized> Drop for StorageGuard<'_, T> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl<T: TextureResource + ?Sized> Debug for StorageGuard<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageGuard")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
