//! Entity allocation
//!
//! Indices are recycled through a free list; every reuse bumps the slot's
//! generation so stale [`EntityId`]s are detected.

use void_core::EntityId;

/// Entity allocator with free list
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation for each index
    generations: Vec<u32>,
    /// Liveness for each index
    alive: Vec<bool>,
    /// Free indices
    free_list: Vec<u32>,
    /// Number of alive entities
    alive_count: usize,
}

impl EntityAllocator {
    /// Create a new entity allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Allocate a new entity
    pub fn allocate(&mut self) -> EntityId {
        self.alive_count += 1;

        if let Some(index) = self.free_list.pop() {
            self.alive[index as usize] = true;
            EntityId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            EntityId::new(index, 0)
        }
    }

    /// Deallocate an entity. Returns false for stale or unknown IDs.
    pub fn deallocate(&mut self, entity: EntityId) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let index = entity.index() as usize;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.alive[index] = false;
        self.free_list.push(entity.index());
        self.alive_count -= 1;
        true
    }

    /// Check if an entity is alive
    #[inline]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        if entity.is_null() {
            return false;
        }
        let index = entity.index() as usize;
        self.alive.get(index).copied().unwrap_or(false)
            && self.generations[index] == entity.generation()
    }

    /// Get the number of alive entities
    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Get total capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}
