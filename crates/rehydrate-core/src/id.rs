//! Identity types for hydrate payloads
//!
//! A payload id stands in for the identity of the incoming-state object a
//! hydrate signal carries. Clones share the id; freshly built or freshly
//! deserialized payloads never do.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PAYLOAD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a hydrate payload
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadId(pub u64);

impl PayloadId {
    pub const ZERO: PayloadId = PayloadId(0);

    /// Allocate the next unused id
    #[inline]
    pub fn next() -> Self {
        PayloadId(NEXT_PAYLOAD_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        PayloadId(u64::from_le_bytes(bytes))
    }
}

impl fmt::Debug for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({:016x})", self.0)
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
