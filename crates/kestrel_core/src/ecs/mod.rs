//! # Entity/Component Dispatch
//!
//! The per-tick pipeline, in order:
//!
//! 1. **Gather** - scan occupied slots for entities whose signature covers a
//!    system's required bits
//! 2. **Dispatch** - hand each system a transient iteration view over the
//!    gathered indices
//! 3. **Reclaim** - after all Logic systems ran, physically remove entities
//!    that were marked dead and recycle their slots
//!
//! ## Design Philosophy
//!
//! - Component types live in an explicit registry, not global state
//! - Entities own their component tables; nothing else stores components
//! - Systems never hold onto store internals past the tick that produced them

mod collection;
mod component;
mod entity;
mod scheduler;
mod store;

pub use collection::EntityCollection;
pub use component::{signature_of, Component, ComponentRegistry, ComponentType, SIGNATURE_BITS};
pub use entity::{Entity, EntityId};
pub use scheduler::{DispatchStats, Scheduler, System, TickContext};
pub use store::EntityStore;
