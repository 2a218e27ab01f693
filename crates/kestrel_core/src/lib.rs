//! # KESTREL Core Dispatch Kernel
//!
//! Fixed-capacity Entity/Component dispatch core designed for:
//! - Pre-allocated entity storage, no growth after startup
//! - Bitmask signature matching between entities and systems
//! - Deterministic, single-threaded gather/dispatch/reclaim ticks
//!
//! ## Architecture Rules
//!
//! 1. **All slots are allocated at store creation** - capacity is fixed
//! 2. **Signatures are immutable** - an entity's component set is decided at
//!    creation and never changes
//! 3. **Two-phase destruction** - systems mark entities dead, the scheduler
//!    reclaims them after the fixed-step pass
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kestrel_core::{ComponentRegistry, EntityStore, Scheduler};
//!
//! let mut registry = ComponentRegistry::new();
//! let position = registry.register::<Position>()?;
//! let store = EntityStore::new(10_000, Arc::new(registry));
//! let mut scheduler = Scheduler::new(store);
//! scheduler.register_logic(MovementSystem::new(position));
//! scheduler.fixed_step(1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;

pub use ecs::{
    signature_of, Component, ComponentRegistry, ComponentType, DispatchStats, Entity,
    EntityCollection, EntityId, EntityStore, Scheduler, System, TickContext, SIGNATURE_BITS,
};
pub use error::{CoreError, CoreResult};
