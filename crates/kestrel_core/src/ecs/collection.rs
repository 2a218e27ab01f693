//! # Entity Iteration View
//!
//! The transient view a system receives for one tick: a lazy, finite,
//! single-pass sequence of entity references backed by the scratch index
//! buffer and the slot array.
//!
//! The view is not restartable and must not be retained past the tick that
//! produced it - the scratch buffer is overwritten on the next gather.
//! Systems must not structurally mutate the store while iterating; only the
//! `alive` flag and component data may change.

use super::entity::Entity;
use super::store::EntityStore;

/// Lazy single-pass iterator over the entities gathered for one system.
///
/// Each `next()` dereferences one gathered index into its live entity.
/// Implemented by progressively splitting the mutable slot slice: gathered
/// indices are strictly ascending, so every yielded reference is disjoint
/// from the ones before it.
pub struct EntityCollection<'a> {
    /// Slots not yet walked past. Shrinks from the front as indices are
    /// consumed.
    rest: &'a mut [Option<Entity>],
    /// Remaining gathered indices, ascending.
    indices: std::slice::Iter<'a, u32>,
    /// Absolute index of `rest[0]` in the slot array.
    offset: usize,
}

impl<'a> EntityCollection<'a> {
    /// Builds a view over the gathered indices of a store.
    ///
    /// `indices` must be ascending slot indices of occupied slots, as
    /// produced by [`EntityStore::gather`].
    pub(crate) fn over(store: &'a mut EntityStore, indices: &'a [u32]) -> Self {
        Self {
            rest: store.slots_mut(),
            indices: indices.iter(),
            offset: 0,
        }
    }

    /// Builds the explicit empty view handed to zero-signature systems.
    #[must_use]
    pub fn empty() -> Self {
        const NO_INDICES: &[u32] = &[];
        Self {
            rest: Default::default(),
            indices: NO_INDICES.iter(),
            offset: 0,
        }
    }

    /// Returns the number of entities remaining in the view.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Checks whether the view has no entities remaining.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.len() == 0
    }
}

impl<'a> Iterator for EntityCollection<'a> {
    type Item = &'a mut Entity;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = *self.indices.next()? as usize;
            let relative = index - self.offset;

            let rest = std::mem::take(&mut self.rest);
            let (_, tail) = rest.split_at_mut(relative);
            let (slot, tail) = tail.split_first_mut()?;
            self.rest = tail;
            self.offset = index + 1;

            // Gathered slots are occupied by invariant; skip defensively.
            if let Some(entity) = slot {
                return Some(entity);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.indices.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EntityCollection<'_> {}
