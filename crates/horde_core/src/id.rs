//! Unique identifiers with generational indices

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier with a generation counter for safe reuse
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id {
    /// Lower 32 bits: index, Upper 32 bits: generation
    bits: u64,
}

impl Id {
    /// Create a new ID from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// Create a null/invalid ID
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    /// Check if this ID is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    /// Get the index portion
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    /// Get the generation portion
    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }

    /// Get the raw bits
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.bits
    }

    /// Create from raw bits
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }
}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Id(null)")
        } else {
            write!(f, "Id({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Id);

        impl $name {
            /// Create from a raw index (generation 0)
            #[inline]
            pub const fn from_index(index: u32) -> Self {
                Self(Id::new(index, 0))
            }

            /// Get the underlying id
            #[inline]
            pub const fn id(&self) -> Id {
                self.0
            }

            /// Get the index portion
            #[inline]
            pub const fn index(&self) -> u32 {
                self.0.index()
            }
        }

        impl From<Id> for $name {
            fn from(id: Id) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

typed_id!(
    /// Opaque identity of a physics collider (body, body part, sensor or trigger)
    ColliderId,
    "Collider"
);

typed_id!(
    /// Identity of an agent owned by a scene
    AgentId,
    "Agent"
);

/// Thread-safe ID generator
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a new ID generator
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Generate the next unique ID
    pub fn next(&self) -> Id {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        Id::new(index as u32, 0)
    }

    /// Generate the next collider id
    pub fn next_collider(&self) -> ColliderId {
        ColliderId(self.next())
    }

    /// Generate the next agent id
    pub fn next_agent(&self) -> AgentId {
        AgentId(self.next())
    }

    /// Generate a batch of IDs efficiently
    pub fn next_batch(&self, count: u32) -> impl Iterator<Item = Id> {
        let start = self.next.fetch_add(count as u64, Ordering::Relaxed);
        (0..count).map(move |i| Id::new((start + i as u64) as u32, 0))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = Id::new(42, 7);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 7);
    }

    #[test]
    fn test_null_id() {
        assert!(Id::null().is_null());
        assert!(!Id::new(0, 0).is_null());
    }

    #[test]
    fn test_id_generator() {
        let gen = IdGenerator::new();
        let id1 = gen.next();
        let id2 = gen.next();
        assert_ne!(id1, id2);
        assert_eq!(id1.index(), 0);
        assert_eq!(id2.index(), 1);
    }

    #[test]
    fn test_typed_ids_share_generator() {
        let gen = IdGenerator::new();
        let collider = gen.next_collider();
        let agent = gen.next_agent();
        assert_eq!(collider.index(), 0);
        assert_eq!(agent.index(), 1);
        assert_eq!(format!("{}", collider), "Collider#0v0");
        assert_eq!(format!("{:?}", agent), "Agent(1v0)");
    }
}
