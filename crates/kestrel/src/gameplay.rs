//! # Demo Gameplay
//!
//! A small set of plain-data components and systems that exercises every
//! dispatch path the scheduler offers: a two-type Logic signature, a
//! single-type Logic signature that marks entities dead, a zero-signature
//! global system, and a Render system.

use std::cell::Cell;
use std::rc::Rc;

use kestrel_core::{ComponentType, EntityCollection, System, TickContext};

// ============================================================================
// COMPONENTS
// ============================================================================

/// Position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

/// Movement in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// X velocity.
    pub x: f32,
    /// Y velocity.
    pub y: f32,
    /// Z velocity.
    pub z: f32,
}

/// Remaining time before an entity expires, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lifetime {
    /// Seconds left. At or below zero the entity is marked dead.
    pub remaining: f32,
}

// ============================================================================
// LOGIC SYSTEMS
// ============================================================================

/// Integrates positions by velocities every fixed step.
pub struct MovementSystem {
    /// Required component types, in registration order.
    required: [ComponentType; 2],
    /// Handle for position access.
    position: ComponentType,
    /// Handle for velocity access.
    velocity: ComponentType,
}

impl MovementSystem {
    /// Creates the system from its component handles.
    #[must_use]
    pub fn new(position: ComponentType, velocity: ComponentType) -> Self {
        Self {
            required: [position, velocity],
            position,
            velocity,
        }
    }
}

impl System for MovementSystem {
    fn required(&self) -> &[ComponentType] {
        &self.required
    }

    fn tick(&mut self, ctx: &TickContext, entities: EntityCollection<'_>) {
        for entity in entities {
            if !entity.is_alive() {
                continue;
            }
            let Some(vel) = entity.component::<Velocity>(self.velocity).copied() else {
                continue;
            };
            if let Some(pos) = entity.component_mut::<Position>(self.position) {
                pos.x += vel.x * ctx.dt;
                pos.y += vel.y * ctx.dt;
                pos.z += vel.z * ctx.dt;
            }
        }
    }
}

/// Counts lifetimes down and marks expired entities dead.
///
/// Marking is all this system does - the store reclaims the slots after the
/// fixed-step pass, never mid-iteration.
pub struct LifetimeSystem {
    /// Required component types.
    required: [ComponentType; 1],
    /// Handle for lifetime access.
    lifetime: ComponentType,
}

impl LifetimeSystem {
    /// Creates the system from its component handle.
    #[must_use]
    pub fn new(lifetime: ComponentType) -> Self {
        Self {
            required: [lifetime],
            lifetime,
        }
    }
}

impl System for LifetimeSystem {
    fn required(&self) -> &[ComponentType] {
        &self.required
    }

    fn tick(&mut self, ctx: &TickContext, entities: EntityCollection<'_>) {
        for entity in entities {
            if !entity.is_alive() {
                continue;
            }
            let Some(lifetime) = entity.component_mut::<Lifetime>(self.lifetime) else {
                continue;
            };
            lifetime.remaining -= ctx.dt;
            if lifetime.remaining <= 0.0 {
                entity.kill();
            }
        }
    }
}

/// Zero-signature global housekeeping: tracks simulated world time.
///
/// Matched against no entities and still ticked once per fixed step with an
/// explicit empty collection.
pub struct WorldClockSystem {
    /// Simulated seconds elapsed, shared with the host.
    elapsed: Rc<Cell<f32>>,
}

impl WorldClockSystem {
    /// Creates the clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Rc::new(Cell::new(0.0)),
        }
    }

    /// Returns a shared handle to the elapsed world time.
    #[must_use]
    pub fn elapsed_handle(&self) -> Rc<Cell<f32>> {
        Rc::clone(&self.elapsed)
    }
}

impl Default for WorldClockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for WorldClockSystem {
    fn required(&self) -> &[ComponentType] {
        &[]
    }

    fn tick(&mut self, ctx: &TickContext, entities: EntityCollection<'_>) {
        debug_assert!(entities.is_empty(), "zero-signature systems get no entities");
        drop(entities);
        self.elapsed.set(self.elapsed.get() + ctx.dt);
    }
}

// ============================================================================
// RENDER SYSTEMS
// ============================================================================

/// Render-pass stand-in: counts the positioned entities it would draw.
///
/// Runs on the render cadence, not the fixed step, and never marks
/// entities dead - reclamation belongs to the fixed-step pass.
pub struct GlowRenderSystem {
    /// Required component types.
    required: [ComponentType; 1],
    /// Entities drawn in the most recent render pass, shared with the host.
    drawn: Rc<Cell<usize>>,
}

impl GlowRenderSystem {
    /// Creates the system from its component handle.
    #[must_use]
    pub fn new(position: ComponentType) -> Self {
        Self {
            required: [position],
            drawn: Rc::new(Cell::new(0)),
        }
    }

    /// Returns a shared handle to the per-pass draw count.
    #[must_use]
    pub fn drawn_handle(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.drawn)
    }
}

impl System for GlowRenderSystem {
    fn required(&self) -> &[ComponentType] {
        &self.required
    }

    fn tick(&mut self, _ctx: &TickContext, entities: EntityCollection<'_>) {
        self.drawn.set(entities.filter(|entity| entity.is_alive()).count());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kestrel_core::{ComponentRegistry, EntityStore, Scheduler};

    use super::*;

    struct Fixture {
        scheduler: Scheduler,
        position: ComponentType,
        velocity: ComponentType,
        lifetime: ComponentType,
    }

    fn fixture() -> Fixture {
        let mut registry = ComponentRegistry::new();
        let position = registry.register::<Position>().unwrap();
        let velocity = registry.register::<Velocity>().unwrap();
        let lifetime = registry.register::<Lifetime>().unwrap();
        let store = EntityStore::new(32, Arc::new(registry));
        Fixture {
            scheduler: Scheduler::new(store),
            position,
            velocity,
            lifetime,
        }
    }

    #[test]
    fn movement_integrates_positions() {
        let mut fx = fixture();
        fx.scheduler
            .register_logic(MovementSystem::new(fx.position, fx.velocity));

        let id = fx
            .scheduler
            .store_mut()
            .create_with(&[fx.position, fx.velocity])
            .unwrap();
        let entity = fx.scheduler.store_mut().get_mut(id).unwrap();
        *entity.component_mut::<Velocity>(fx.velocity).unwrap() = Velocity {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };

        fx.scheduler.fixed_step(0.5);

        let entity = fx.scheduler.store().get(id).unwrap();
        let pos = entity.component::<Position>(fx.position).unwrap();
        assert_eq!(*pos, Position { x: 0.5, y: 1.0, z: 1.5 });
    }

    #[test]
    fn expired_lifetimes_are_reclaimed_after_the_pass() {
        let mut fx = fixture();
        fx.scheduler.register_logic(LifetimeSystem::new(fx.lifetime));

        let id = fx.scheduler.store_mut().create_with(&[fx.lifetime]).unwrap();
        let entity = fx.scheduler.store_mut().get_mut(id).unwrap();
        entity.component_mut::<Lifetime>(fx.lifetime).unwrap().remaining = 0.03;

        let stats = fx.scheduler.fixed_step(0.016);
        assert_eq!(stats.reclaimed, 0);
        assert!(fx.scheduler.store().get(id).is_some());

        let stats = fx.scheduler.fixed_step(0.016);
        assert_eq!(stats.reclaimed, 1);
        assert!(fx.scheduler.store().get(id).is_none());
    }

    #[test]
    fn world_clock_accumulates_fixed_steps() {
        let mut fx = fixture();
        let clock = WorldClockSystem::new();
        let elapsed = clock.elapsed_handle();
        fx.scheduler.register_logic(clock);

        fx.scheduler.fixed_step(0.25);
        fx.scheduler.fixed_step(0.25);
        assert!((elapsed.get() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn glow_render_counts_live_positioned_entities() {
        let mut fx = fixture();
        let glow = GlowRenderSystem::new(fx.position);
        let drawn = glow.drawn_handle();
        fx.scheduler.register_render(glow);

        fx.scheduler.store_mut().create_with(&[fx.position]).unwrap();
        fx.scheduler
            .store_mut()
            .create_with(&[fx.position, fx.velocity])
            .unwrap();
        fx.scheduler.store_mut().create_with(&[fx.velocity]).unwrap();

        fx.scheduler.render(0.016);
        assert_eq!(drawn.get(), 2);
    }
}
