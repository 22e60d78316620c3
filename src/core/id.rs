use std::sync::atomic::{AtomicU64, Ordering};

/// Stable particle identifier.
pub type ParticleId = u64;

/// Monotonic source of particle identifiers.
///
/// Increments atomically, so one allocator may be shared by threads that
/// construct particles concurrently. Identifiers are unique per allocator only;
/// particles built from different allocators may collide.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

static GLOBAL: IdAllocator = IdAllocator::new();

impl IdAllocator {
    /// Create an allocator whose first identifier is 0.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create an allocator whose first identifier is `first`.
    pub const fn starting_at(first: ParticleId) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide allocator used by the default constructors of `Particle`.
    pub fn global() -> &'static IdAllocator {
        &GLOBAL
    }

    /// Hand out the next identifier.
    #[inline]
    pub fn allocate(&self) -> ParticleId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Identifier that the next call to `allocate` will return.
    pub fn peek(&self) -> ParticleId {
        self.next.load(Ordering::Relaxed)
    }
}
