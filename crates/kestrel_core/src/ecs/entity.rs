//! # Entity Data Model
//!
//! An entity is an identity (slot index plus generation) together with a
//! fixed-size, type-indexed component table and a signature bitmask. The
//! entity exclusively owns its component table; no other structure holds
//! components directly.

use super::component::{Component, ComponentType};

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: slot index into the store
/// - Upper 32 bits: generation counter for detecting stale references
///
/// The generation increments every time a slot is reclaimed, so an ID held
/// across a reclamation cycle resolves to `None` instead of silently
/// addressing an unrelated entity that reused the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from slot index and generation.
    #[inline]
    #[must_use]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

/// An entity: identity, liveness flag, signature, and component table.
///
/// The signature is the bitwise OR of the masks of every component type the
/// entity was created with. It never changes after creation - there is no
/// way to attach or detach components from a live entity.
///
/// Destruction is two-phase: [`kill`](Self::kill) only flips the `alive`
/// flag; the slot is recycled by the store's reclamation pass after the
/// fixed-step systems have run.
pub struct Entity {
    /// Identity of the slot this entity occupies.
    id: EntityId,
    /// Liveness flag. Cleared by gameplay logic, honored by reclamation.
    alive: bool,
    /// Bitmask of the component types this entity carries.
    signature: u64,
    /// Type-indexed component table, sized to the total number of
    /// registered component types.
    components: Box<[Option<Box<dyn Component>>]>,
}

impl Entity {
    /// Creates a new, alive entity. Called by the store only.
    pub(crate) fn new(
        id: EntityId,
        signature: u64,
        components: Box<[Option<Box<dyn Component>>]>,
    ) -> Self {
        Self {
            id,
            alive: true,
            signature,
            components,
        }
    }

    /// Returns this entity's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns this entity's signature bitmask.
    #[inline]
    #[must_use]
    pub const fn signature(&self) -> u64 {
        self.signature
    }

    /// Checks whether this entity is still alive.
    #[inline]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks this entity dead.
    ///
    /// The entity stays visible to gather operations until the reclamation
    /// pass at the end of the current fixed-step tick, so systems that run
    /// later in the same tick still observe it.
    #[inline]
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Checks whether this entity carries a component of the given type.
    #[inline]
    #[must_use]
    pub const fn has(&self, ty: ComponentType) -> bool {
        (self.signature & ty.mask()) != 0
    }

    /// Returns the component of the given type, untyped.
    #[inline]
    #[must_use]
    pub fn get(&self, ty: ComponentType) -> Option<&dyn Component> {
        self.components.get(ty.index()).and_then(|slot| slot.as_deref())
    }

    /// Returns the component of the given type, untyped and mutable.
    #[inline]
    pub fn get_mut(&mut self, ty: ComponentType) -> Option<&mut dyn Component> {
        self.components
            .get_mut(ty.index())
            .and_then(|slot| slot.as_deref_mut())
    }

    /// Returns the component of the given type, downcast to `T`.
    ///
    /// Yields `None` when the entity does not carry the type or when `T`
    /// does not match the registered kind behind the handle.
    #[inline]
    #[must_use]
    pub fn component<T: Component>(&self, ty: ComponentType) -> Option<&T> {
        self.get(ty)?.as_any().downcast_ref::<T>()
    }

    /// Returns the component of the given type, downcast to `T`, mutable.
    #[inline]
    pub fn component_mut<T: Component>(&mut self, ty: ComponentType) -> Option<&mut T> {
        self.get_mut(ty)?.as_any_mut().downcast_mut::<T>()
    }
}
