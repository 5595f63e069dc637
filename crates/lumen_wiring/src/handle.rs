use core::fmt;
use core::num::NonZeroU64;

/// Opaque reference to a resource owned by the graph.
///
/// The wiring layer stores and returns handles but never inspects them.
/// A handle is never null; an unconnected slot is `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle(NonZeroU64);

impl ResourceHandle {
    /// Creates a handle from its raw value. Returns `None` for `0`, which is
    /// reserved as the null handle.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for ResourceHandle {
    fn from(raw: NonZeroU64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource_{}", self.0)
    }
}
