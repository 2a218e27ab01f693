//! # Component Types and Registry
//!
//! Components are pure data containers with no behavior. Every component
//! kind is registered once at startup with the [`ComponentRegistry`], which
//! assigns it a stable bit index in the signature word and captures a
//! factory that builds fresh, default-valued instances.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

/// Width of the signature word in bits.
///
/// This is the hard ceiling on the number of distinct component types a
/// process can register. Exceeding it is a configuration error, not a
/// runtime-recoverable one.
pub const SIGNATURE_BITS: u32 = u64::BITS;

/// Marker trait for ECS components.
///
/// Components are plain data records. The trait is object-safe so that an
/// entity can own a heterogeneous component table; the `as_any` hooks allow
/// typed access back out via downcasting.
///
/// A blanket implementation covers every `Any + Send + Sync` type, so
/// component structs only need to derive `Default` to be registrable.
pub trait Component: Any + Send + Sync {
    /// Returns this component as a dynamic `Any` reference.
    fn as_any(&self) -> &dyn Any;

    /// Returns this component as a mutable dynamic `Any` reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send + Sync> Component for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Opaque handle to a registered component kind.
///
/// The handle carries the component's bit index in the signature word.
/// Handles are only meaningful with the registry that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentType {
    /// Bit index in the signature word (0-63).
    bit: u32,
}

impl ComponentType {
    /// Returns the bit index of this component type (0-63).
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u32 {
        self.bit
    }

    /// Returns the signature mask contributed by this component type.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u64 {
        1u64 << self.bit
    }

    /// Returns the index of this component type in an entity's table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.bit as usize
    }
}

/// Derives a signature from a set of component types.
///
/// The signature is the bitwise OR of each type's bit. An empty set yields
/// the zero signature, which the scheduler treats as "matches no entities".
#[must_use]
pub fn signature_of(types: &[ComponentType]) -> u64 {
    types.iter().fold(0u64, |signature, ty| signature | ty.mask())
}

/// One registered component kind: its factory and diagnostic name.
struct RegistryEntry {
    /// Builds a fresh, default-valued instance.
    factory: Box<dyn Fn() -> Box<dyn Component> + Send + Sync>,
    /// Type name, for logs and panics.
    name: &'static str,
}

/// Process-wide registration of component kinds.
///
/// The registry is an explicit object created at startup and shared (behind
/// an `Arc`) by every store in the process - there is no hidden global
/// counter. Bit indices are assigned in monotonically increasing order
/// starting at 0 and are never reused.
///
/// Registration is complete before any [`EntityStore`](super::EntityStore)
/// is built, because entity component tables are sized to the total number
/// of registered kinds.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Registered kinds, indexed by bit.
    entries: Vec<RegistryEntry>,
    /// Lookup for idempotent re-registration.
    by_type: HashMap<TypeId, u32>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component kind and returns its handle.
    ///
    /// Registration is idempotent: calling this twice for the same type
    /// returns the handle assigned the first time. The `Default` bound is
    /// what makes construction infallible - a kind that cannot be
    /// default-constructed is rejected at compile time rather than at
    /// registration time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SignatureOverflow`] when a 65th distinct kind
    /// is registered. This is fatal: callers are expected to abort startup.
    pub fn register<T: Component + Default>(&mut self) -> CoreResult<ComponentType> {
        let type_id = TypeId::of::<T>();
        if let Some(&bit) = self.by_type.get(&type_id) {
            return Ok(ComponentType { bit });
        }

        let bit = u32::try_from(self.entries.len()).unwrap_or(SIGNATURE_BITS);
        if bit >= SIGNATURE_BITS {
            return Err(CoreError::SignatureOverflow {
                limit: SIGNATURE_BITS,
            });
        }

        self.entries.push(RegistryEntry {
            factory: Box::new(|| -> Box<dyn Component> { Box::<T>::default() }),
            name: type_name::<T>(),
        });
        self.by_type.insert(type_id, bit);
        tracing::debug!(bit, name = type_name::<T>(), "registered component type");

        Ok(ComponentType { bit })
    }

    /// Returns the number of registered component kinds.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether no component kinds are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a fresh, default-valued instance of a registered kind.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by a different registry.
    #[must_use]
    pub fn instantiate(&self, ty: ComponentType) -> Box<dyn Component> {
        assert!(
            ty.index() < self.entries.len(),
            "component type handle does not belong to this registry"
        );
        (self.entries[ty.index()].factory)()
    }

    /// Returns the diagnostic name of a registered kind.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by a different registry.
    #[must_use]
    pub fn name_of(&self, ty: ComponentType) -> &'static str {
        assert!(
            ty.index() < self.entries.len(),
            "component type handle does not belong to this registry"
        );
        self.entries[ty.index()].name
    }
}
