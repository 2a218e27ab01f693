//! # System Scheduling and Tick Protocol
//!
//! Systems declare the component types they need; the scheduler derives a
//! signature for each at registration and keeps Logic and Render systems in
//! two separate collections, each stable-sorted by ascending signature.
//!
//! Per frame there are two independent passes:
//!
//! - **Fixed-step pass** (deterministic `dt`): every Logic system is ticked
//!   in sorted order with the entities matching its signature, then the
//!   store reclaims dead entities.
//! - **Render pass** (variable cadence): same gather/dispatch structure over
//!   Render systems, but no reclamation - destruction stays deterministic
//!   and decoupled from frame rate.
//!
//! ## Gather reuse
//!
//! Within a pass, a scan result depends only on the signature and the
//! entity set, both unchanged until the pass ends. Sorting systems by
//! signature therefore lets consecutive systems with equal signatures share
//! a single scan: the previously gathered index list is reused verbatim.

use std::sync::Arc;

use super::collection::EntityCollection;
use super::component::{signature_of, ComponentRegistry, ComponentType};
use super::store::EntityStore;

/// Per-tick context handed to every system alongside its entity view.
pub struct TickContext {
    /// Delta time for this pass. The fixed-step pass always receives the
    /// same value; the render pass receives the frame delta.
    pub dt: f32,
    /// Monotonic fixed-step tick counter.
    pub tick: u64,
    /// Shared component registry, for diagnostics and typed access.
    pub registry: Arc<ComponentRegistry>,
}

/// A unit of per-tick behavior.
///
/// A system declares the component types it requires and is ticked once per
/// pass with the matching entity subset. A system requiring zero component
/// types is matched against no entities and still ticked with an explicit
/// empty collection - that is how global/background work is expressed.
///
/// Systems may mutate component data and mark entities dead, but must not
/// structurally mutate the store (create/reclaim) during a tick.
pub trait System {
    /// The component types this system requires.
    fn required(&self) -> &[ComponentType];

    /// Ticks this system with the entities matching its signature.
    fn tick(&mut self, ctx: &TickContext, entities: EntityCollection<'_>);
}

/// A registered system with its derived signature.
struct SystemSlot {
    /// OR of the required types' bits, derived once at registration.
    signature: u64,
    /// The system itself.
    system: Box<dyn System>,
}

/// Counters for one gather/dispatch pass.
///
/// Makes the gather-reuse optimization observable: `scans + reuses` equals
/// the number of non-empty-signature systems ticked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Systems ticked during the pass.
    pub systems: u64,
    /// Fresh signature scans performed.
    pub scans: u64,
    /// Scans skipped because the previous system had the same signature.
    pub reuses: u64,
    /// Total entity references handed to systems.
    pub entities: u64,
    /// Entities reclaimed at the end of the pass (fixed-step only).
    pub reclaimed: u64,
}

/// Registers systems, sorts them for scan reuse, and drives the per-tick
/// gather-and-dispatch loop followed by dead-entity reclamation.
pub struct Scheduler {
    /// The entity store this scheduler dispatches over.
    store: EntityStore,
    /// Logic systems, stable-sorted by ascending signature.
    logic: Vec<SystemSlot>,
    /// Render systems, stable-sorted by ascending signature.
    render: Vec<SystemSlot>,
    /// Scratch gather buffer, sized to capacity and reused across ticks.
    scratch: Vec<u32>,
    /// Fixed-step ticks completed.
    ticks: u64,
}

impl Scheduler {
    /// Creates a scheduler over a store.
    ///
    /// The scratch gather buffer is allocated here, once, at full capacity;
    /// the per-tick loop never allocates.
    #[must_use]
    pub fn new(store: EntityStore) -> Self {
        let capacity = store.capacity();
        Self {
            store,
            logic: Vec::new(),
            render: Vec::new(),
            scratch: Vec::with_capacity(capacity),
            ticks: 0,
        }
    }

    /// Returns the entity store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Returns the entity store, mutable.
    ///
    /// For startup population and between-tick inspection; never call while
    /// a pass is running.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Returns the number of fixed-step ticks completed.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Registers a Logic system, ticked every fixed-step pass.
    ///
    /// The signature is derived once here. The sort is stable, so systems
    /// with equal signatures keep their registration order.
    pub fn register_logic<S: System + 'static>(&mut self, system: S) {
        Self::register(&mut self.logic, Box::new(system));
    }

    /// Registers a Render system, ticked every render pass.
    pub fn register_render<S: System + 'static>(&mut self, system: S) {
        Self::register(&mut self.render, Box::new(system));
    }

    fn register(slots: &mut Vec<SystemSlot>, system: Box<dyn System>) {
        let signature = signature_of(system.required());
        tracing::debug!(signature, "registered system");
        slots.push(SystemSlot { signature, system });
        slots.sort_by_key(|slot| slot.signature);
    }

    /// Runs one fixed-step pass: every Logic system in sorted-signature
    /// order, then reclamation of entities marked dead during the pass.
    pub fn fixed_step(&mut self, dt: f32) -> DispatchStats {
        let ctx = TickContext {
            dt,
            tick: self.ticks,
            registry: self.store.registry_handle(),
        };
        let mut stats = Self::run_pass(&mut self.store, &mut self.scratch, &mut self.logic, &ctx);
        stats.reclaimed = self.store.reclaim() as u64;
        self.ticks += 1;
        stats
    }

    /// Runs one render pass: every Render system in sorted-signature order.
    ///
    /// Never reclaims entities - reclamation is fixed-step-only.
    pub fn render(&mut self, dt: f32) -> DispatchStats {
        let ctx = TickContext {
            dt,
            tick: self.ticks,
            registry: self.store.registry_handle(),
        };
        Self::run_pass(&mut self.store, &mut self.scratch, &mut self.render, &ctx)
    }

    /// The gather-or-reuse dispatch loop shared by both passes.
    fn run_pass(
        store: &mut EntityStore,
        scratch: &mut Vec<u32>,
        systems: &mut [SystemSlot],
        ctx: &TickContext,
    ) -> DispatchStats {
        let mut stats = DispatchStats::default();
        let mut gathered: Option<u64> = None;

        for slot in systems.iter_mut() {
            stats.systems += 1;

            if slot.signature == 0 {
                slot.system.tick(ctx, EntityCollection::empty());
                continue;
            }

            if gathered == Some(slot.signature) {
                stats.reuses += 1;
            } else {
                store.gather(slot.signature, scratch);
                gathered = Some(slot.signature);
                stats.scans += 1;
            }

            stats.entities += scratch.len() as u64;
            slot.system.tick(ctx, EntityCollection::over(store, scratch));
        }

        stats
    }
}
