//! Resource handle allocation.

use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

use lumen_wiring::ResourceHandle;

/// Mints graph-unique [`ResourceHandle`]s.
///
/// Handles start at 1 and increase. They are never reused within a graph,
/// not even across recompilation.
#[derive(Debug, Default)]
pub struct ResourceAllocator {
    next: AtomicU64,
}

impl ResourceAllocator {
    /// Creates an allocator whose first handle is `resource_1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next handle.
    pub fn allocate(&self) -> ResourceHandle {
        let offset = self.next.fetch_add(1, Ordering::Relaxed);
        ResourceHandle::from(NonZeroU64::MIN.saturating_add(offset))
    }

    /// Returns how many handles have been allocated.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
