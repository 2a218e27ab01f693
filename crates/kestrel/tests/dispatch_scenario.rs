//! End-to-end verification of the gather/dispatch/reclaim protocol with the
//! demo gameplay systems wired into a real scheduler.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use kestrel::gameplay::{Lifetime, LifetimeSystem, MovementSystem, Position, Velocity};
use kestrel_core::{
    ComponentRegistry, ComponentType, EntityCollection, EntityId, EntityStore, Scheduler, System,
    TickContext,
};

struct Fixture {
    scheduler: Scheduler,
    position: ComponentType,
    velocity: ComponentType,
    lifetime: ComponentType,
}

fn fixture(capacity: usize) -> Fixture {
    let mut registry = ComponentRegistry::new();
    let position = registry.register::<Position>().unwrap();
    let velocity = registry.register::<Velocity>().unwrap();
    let lifetime = registry.register::<Lifetime>().unwrap();
    Fixture {
        scheduler: Scheduler::new(EntityStore::new(capacity, Arc::new(registry))),
        position,
        velocity,
        lifetime,
    }
}

/// Counts the entities handed to it each tick.
struct CountingSystem {
    required: Vec<ComponentType>,
    seen: Rc<Cell<usize>>,
}

impl System for CountingSystem {
    fn required(&self) -> &[ComponentType] {
        &self.required
    }

    fn tick(&mut self, _ctx: &TickContext, entities: EntityCollection<'_>) {
        self.seen.set(entities.count());
    }
}

/// The scenario from the design notes: a Logic system requiring {Position},
/// 3 entities with {Position} and 2 with {Position, Velocity}; one tick
/// gathers all 5; killing 2 drops the count to 3 and frees slots that are
/// reused before the frontier grows.
#[test]
fn position_system_scenario() {
    let mut fx = fixture(16);
    let seen = Rc::new(Cell::new(0));
    fx.scheduler.register_logic(CountingSystem {
        required: vec![fx.position],
        seen: Rc::clone(&seen),
    });

    let mut plain: Vec<EntityId> = Vec::new();
    for _ in 0..3 {
        plain.push(fx.scheduler.store_mut().create_with(&[fx.position]).unwrap());
    }
    for _ in 0..2 {
        fx.scheduler
            .store_mut()
            .create_with(&[fx.position, fx.velocity])
            .unwrap();
    }

    fx.scheduler.fixed_step(1.0 / 60.0);
    assert_eq!(seen.get(), 5);
    assert_eq!(fx.scheduler.store().count(), 5);

    // Mark two dead; they are reclaimed at the end of the next pass.
    fx.scheduler.store_mut().get_mut(plain[0]).unwrap().kill();
    fx.scheduler.store_mut().get_mut(plain[1]).unwrap().kill();
    let stats = fx.scheduler.fixed_step(1.0 / 60.0);
    assert_eq!(stats.reclaimed, 2);
    assert_eq!(fx.scheduler.store().count(), 3);

    // Freed slots are reused before the frontier advances.
    let frontier = fx.scheduler.store().high_water();
    let reused = fx.scheduler.store_mut().create_with(&[fx.position]).unwrap();
    assert!(plain
        .iter()
        .any(|stale| stale.index() == reused.index()));
    assert_eq!(fx.scheduler.store().high_water(), frontier);
}

/// Capacity is a hard wall: the (max+1)-th creation fails visibly and
/// reclaiming frees room again.
#[test]
fn capacity_is_fixed_but_recyclable() {
    let mut fx = fixture(4);
    let store = fx.scheduler.store_mut();

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(store.create_with(&[fx.position]).unwrap());
    }
    assert!(store.create_with(&[fx.position]).is_none());
    assert_eq!(store.count(), 4);

    store.get_mut(ids[1]).unwrap().kill();
    store.reclaim();
    assert_eq!(store.count(), 3);
    assert!(store.create_with(&[fx.position]).is_some());
    assert!(store.create_with(&[fx.position]).is_none());
}

/// A full movement-plus-expiry simulation: movers integrate every fixed
/// step until their lifetimes run out, then their slots recycle.
#[test]
fn movers_expire_and_slots_recycle() {
    let mut fx = fixture(8);
    fx.scheduler
        .register_logic(MovementSystem::new(fx.position, fx.velocity));
    fx.scheduler.register_logic(LifetimeSystem::new(fx.lifetime));

    let mover = fx
        .scheduler
        .store_mut()
        .create_with(&[fx.position, fx.velocity, fx.lifetime])
        .unwrap();
    {
        let entity = fx.scheduler.store_mut().get_mut(mover).unwrap();
        entity.component_mut::<Velocity>(fx.velocity).unwrap().x = 2.0;
        entity.component_mut::<Lifetime>(fx.lifetime).unwrap().remaining = 0.25;
    }

    // 0.1s per tick: alive for ticks 1 and 2, expires on tick 3.
    fx.scheduler.fixed_step(0.1);
    fx.scheduler.fixed_step(0.1);
    {
        let entity = fx.scheduler.store().get(mover).unwrap();
        let pos = entity.component::<Position>(fx.position).unwrap();
        assert!((pos.x - 0.4).abs() < 1e-6);
    }

    fx.scheduler.fixed_step(0.1);
    assert!(fx.scheduler.store().get(mover).is_none());

    // The recycled slot carries a fresh generation; the stale ID stays dead.
    let next = fx.scheduler.store_mut().create_with(&[fx.position]).unwrap();
    assert_eq!(next.index(), mover.index());
    assert_ne!(next.generation(), mover.generation());
    assert!(fx.scheduler.store().get(mover).is_none());
}

/// Two equal-signature systems share one scan per pass, across passes.
#[test]
fn equal_signatures_share_scans_every_tick() {
    let mut fx = fixture(16);
    for _ in 0..2 {
        fx.scheduler.register_logic(CountingSystem {
            required: vec![fx.position],
            seen: Rc::new(Cell::new(0)),
        });
    }
    for _ in 0..6 {
        fx.scheduler.store_mut().create_with(&[fx.position]).unwrap();
    }

    for _ in 0..3 {
        let stats = fx.scheduler.fixed_step(1.0 / 60.0);
        assert_eq!(stats.scans, 1);
        assert_eq!(stats.reuses, 1);
        assert_eq!(stats.entities, 12);
    }
}
