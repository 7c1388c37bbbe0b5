//! Process-wide monotonic atom id allocation.

use cogspace_core::AtomId;
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing id generator. Ids start at 1; `0` is
/// reserved (`AtomId::NONE`). Never wraps under any realistic workload
/// since the counter is 64-bit.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator whose first `next()` call returns id 1.
    pub fn new() -> Self {
        IdAllocator {
            next: AtomicU64::new(1),
        }
    }

    /// Atomically allocate and return the next id.
    pub fn next(&self) -> AtomId {
        AtomId(self.next.fetch_add(1, Ordering::SeqCst))
    }
}
