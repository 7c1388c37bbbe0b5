//! A mutual-exclusion-guarded shared byte buffer.
//!
//! The reference implementation backs this with a SysV shared-memory
//! segment (`shmget`/`shmat`) plus a `pthread_mutex_t` allocated inside
//! it so that unrelated processes can map and lock the same region.
//! Nothing in this workspace's dependency stack talks to SysV IPC, and
//! every component here lives in one process, so this models the same
//! contract — create, lock for exclusive access to the payload,
//! destroy — over a `parking_lot::Mutex<Vec<u8>>` instead. `lock`'s
//! guard releases the mutex on drop, which stands in for the reference
//! implementation's explicit `shared_memory_unlock`.
use cogspace_core::{CogError, Result};
use parking_lot::{Mutex, MutexGuard};
use std::ops::{Deref, DerefMut};

/// A fixed-size byte buffer with exclusive-access locking.
pub struct SharedRegion {
    size: usize,
    buffer: Mutex<Vec<u8>>,
}

impl SharedRegion {
    /// Allocate a zeroed region of `size` bytes.
    pub fn create(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CogError::InvalidArgument("shared region size must be non-zero".into()));
        }
        Ok(SharedRegion {
            size,
            buffer: Mutex::new(vec![0u8; size]),
        })
    }

    /// A region of the workspace's default size (1 MiB).
    pub fn with_default_size() -> Result<Self> {
        Self::create(cogspace_core::DEFAULT_SHARED_REGION_SIZE)
    }

    /// The region's fixed size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Acquire exclusive access to the payload. Blocks until any other
    /// holder releases it (by dropping its guard).
    pub fn lock(&self) -> RegionGuard<'_> {
        RegionGuard(self.buffer.lock())
    }
}

/// Exclusive access to a [`SharedRegion`]'s payload. Dropping the guard
/// is the unlock.
pub struct RegionGuard<'a>(MutexGuard<'a, Vec<u8>>);

impl Deref for RegionGuard<'_> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl DerefMut for RegionGuard<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn rejects_zero_size() {
        assert!(SharedRegion::create(0).is_err());
    }

    #[test]
    fn starts_zeroed_and_holds_writes() {
        let region = SharedRegion::create(16).unwrap();
        {
            let mut guard = region.lock();
            assert!(guard.iter().all(|&b| b == 0));
            guard[0] = 42;
        }
        assert_eq!(region.lock()[0], 42);
    }

    #[test]
    fn concurrent_lockers_never_interleave_writes() {
        let region = Arc::new(SharedRegion::create(8).unwrap());
        let threads: Vec<_> = (0..8u8)
            .map(|tag| {
                let region = Arc::clone(&region);
                thread::spawn(move || {
                    let mut guard = region.lock();
                    for b in guard.iter_mut() {
                        *b = tag;
                    }
                    thread::yield_now();
                    assert!(guard.iter().all(|&b| b == tag));
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }
    }
}
