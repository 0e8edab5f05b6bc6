//! Entity identifiers with generational indices
//!
//! Two identifiers exist for an entity during a scene load:
//! - [`EntityPlaceholder`]: the scene-local slot an entity definition occupies
//!   while its components are decoded. Stable before anything is created.
//! - [`EntityId`]: the live identifier handed out by the entity store once the
//!   scene's entities are instantiated.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A live entity identifier with a generation counter for safe reuse
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntityId {
    /// Lower 32 bits: index, Upper 32 bits: generation
    bits: u64,
}

impl EntityId {
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

impl Default for EntityId {
    fn default() -> Self {
        Self::null()
    }
}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

/// Scene-local slot of an entity definition, assigned in declaration order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityPlaceholder(u32);

impl EntityPlaceholder {
    #[inline]
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// Position of the definition within its scene
    #[inline]
    pub const fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
