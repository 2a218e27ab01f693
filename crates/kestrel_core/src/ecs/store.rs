//! # Entity Store
//!
//! Fixed-capacity slot arena for entities. All slots are allocated at store
//! creation; `create_with` and `reclaim` only move entities in and out of
//! pre-allocated positions.
//!
//! ## Slot discipline
//!
//! - `high_water` is the frontier: the number of slots ever opened at the
//!   tail. Every occupied slot lives below it.
//! - `free_indexes` is a LIFO pool of reclaimed holes below the frontier.
//! - Invariant: every index below the frontier is either occupied or on the
//!   free list; indices at or beyond the frontier are untouched.

use std::sync::Arc;

use super::component::{signature_of, Component, ComponentRegistry, ComponentType};
use super::entity::{Entity, EntityId};

/// Owns all entity slots, the free list, and the high-water frontier.
///
/// Entities are never moved between slots; a slot's occupant only changes
/// across a creation/reclamation boundary. Capacity is fixed at
/// construction and never grows.
pub struct EntityStore {
    /// All entity slots (pre-allocated).
    slots: Box<[Option<Entity>]>,
    /// Per-slot generation counters. Bumped when a slot is reclaimed.
    generations: Box<[u32]>,
    /// LIFO pool of reclaimed slot indices available for reuse.
    free_indexes: Vec<u32>,
    /// Frontier: number of slots ever opened at the tail.
    high_water: usize,
    /// Number of currently occupied slots (alive or dead-but-unreclaimed).
    count: usize,
    /// Shared component registry; sizes new component tables.
    registry: Arc<ComponentRegistry>,
}

impl EntityStore {
    /// Creates a store with the given fixed capacity.
    ///
    /// Registration must be complete before the store is built: entity
    /// component tables are sized to the registry's total.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize, registry: Arc<ComponentRegistry>) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "capacity cannot exceed u32::MAX"
        );

        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>();

        Self {
            slots: slots.into_boxed_slice(),
            generations: vec![0u32; capacity].into_boxed_slice(),
            free_indexes: Vec::with_capacity(capacity),
            high_water: 0,
            count: 0,
            registry,
        }
    }

    /// Returns the fixed capacity of this store.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently occupied slots.
    ///
    /// Dead entities count until the reclamation pass removes them.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the frontier: the number of slots ever opened at the tail.
    #[inline]
    #[must_use]
    pub const fn high_water(&self) -> usize {
        self.high_water
    }

    /// Returns the component registry backing this store.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Returns a shared handle to the component registry.
    #[must_use]
    pub fn registry_handle(&self) -> Arc<ComponentRegistry> {
        Arc::clone(&self.registry)
    }

    /// Creates an entity carrying one default-valued component per
    /// requested type.
    ///
    /// The slot index comes from the free pool when one is available,
    /// otherwise the frontier advances. Returns `None` without side effects
    /// once every slot is occupied - callers must check.
    pub fn create_with(&mut self, types: &[ComponentType]) -> Option<EntityId> {
        if self.count >= self.capacity() {
            tracing::debug!(capacity = self.capacity(), "entity store at capacity");
            return None;
        }

        let index = match self.free_indexes.pop() {
            Some(reused) => reused as usize,
            None => {
                let fresh = self.high_water;
                self.high_water += 1;
                fresh
            }
        };

        let mut components: Vec<Option<Box<dyn Component>>> =
            (0..self.registry.len()).map(|_| None).collect();
        for &ty in types {
            components[ty.index()] = Some(self.registry.instantiate(ty));
        }

        #[allow(clippy::cast_possible_truncation)] // capacity <= u32::MAX
        let id = EntityId::new(index as u32, self.generations[index]);
        self.slots[index] = Some(Entity::new(id, signature_of(types), components.into()));
        self.count += 1;

        Some(id)
    }

    /// Looks up an entity by ID.
    ///
    /// Returns `None` for indices beyond the frontier, for reclaimed slots,
    /// and for stale IDs whose slot was recycled since they were issued.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let index = id.index() as usize;
        if index >= self.high_water || self.generations[index] != id.generation() {
            return None;
        }
        self.slots[index].as_ref()
    }

    /// Looks up an entity by ID, mutable.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = id.index() as usize;
        if index >= self.high_water || self.generations[index] != id.generation() {
            return None;
        }
        self.slots[index].as_mut()
    }

    /// Collects the indices of every occupied slot whose entity signature
    /// covers `signature`, in ascending slot order.
    ///
    /// Matching is `(S & E) == S`: the entity must carry at least every
    /// required bit; extra components are irrelevant. Entities marked dead
    /// but not yet reclaimed still match - destruction is observable only
    /// after the reclamation pass.
    ///
    /// The output buffer is cleared first and is expected to be a scratch
    /// buffer sized to capacity, reused across ticks.
    pub fn gather(&self, signature: u64, out: &mut Vec<u32>) {
        debug_assert!(signature != 0, "zero signatures are dispatched empty");
        out.clear();
        for (index, slot) in self.slots[..self.high_water].iter().enumerate() {
            if let Some(entity) = slot {
                if entity.signature() & signature == signature {
                    #[allow(clippy::cast_possible_truncation)] // capacity <= u32::MAX
                    out.push(index as u32);
                }
            }
        }
    }

    /// Physically removes every dead entity and recycles its slot.
    ///
    /// Scans from the frontier down to slot 0. A dead entity at the tail
    /// shrinks the frontier (and the downward scan lets shrinkage cascade
    /// through consecutive trailing dead entities); any other dead entity
    /// leaves a hole that is pushed onto the free pool. Each cleared slot's
    /// generation is bumped so outstanding IDs go stale.
    ///
    /// Returns the number of entities reclaimed.
    pub fn reclaim(&mut self) -> usize {
        let mut reclaimed = 0;
        let mut index = self.high_water;
        while index > 0 {
            index -= 1;
            let dead = matches!(&self.slots[index], Some(entity) if !entity.is_alive());
            if !dead {
                continue;
            }

            self.slots[index] = None;
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.count -= 1;
            reclaimed += 1;

            if index + 1 == self.high_water {
                self.high_water -= 1;
            } else {
                #[allow(clippy::cast_possible_truncation)] // capacity <= u32::MAX
                self.free_indexes.push(index as u32);
            }
        }

        if reclaimed > 0 {
            tracing::trace!(reclaimed, high_water = self.high_water, "reclaimed entities");
        }
        reclaimed
    }

    /// Exposes the slot array to the iteration view.
    pub(crate) fn slots_mut(&mut self) -> &mut [Option<Entity>] {
        &mut self.slots
    }
}
