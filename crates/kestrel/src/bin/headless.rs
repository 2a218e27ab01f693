//! # Headless Driver
//!
//! Runs the full dispatch pipeline without a window: registry, store,
//! scheduler, frame loop, demo systems. Spawns a mixed population, runs a
//! fixed number of deterministic frames, and prints a summary.
//!
//! Reads `kestrel.toml` from the working directory when present, otherwise
//! uses defaults.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use kestrel::config::EngineConfig;
use kestrel::game_loop::GameLoop;
use kestrel::gameplay::{
    GlowRenderSystem, Lifetime, LifetimeSystem, MovementSystem, Position, Velocity,
    WorldClockSystem,
};
use kestrel_core::{ComponentRegistry, EntityStore, Scheduler};

/// Frames to simulate.
const FRAMES: u32 = 600;

/// Simulated delta per frame (60 FPS).
const FRAME_DELTA: f32 = 1.0 / 60.0;

/// Entities spawned with position + velocity + lifetime.
const MOVER_COUNT: usize = 1_000;

/// Entities spawned with position only.
const PROP_COUNT: usize = 500;

#[allow(clippy::cast_precision_loss)] // spawn spreads and stat prints
fn main() -> Result<(), Box<dyn Error>> {
    let config_path = Path::new("kestrel.toml");
    let config = if config_path.exists() {
        EngineConfig::from_toml(config_path)?
    } else {
        EngineConfig::default()
    };

    let mut registry = ComponentRegistry::new();
    let position = registry.register::<Position>()?;
    let velocity = registry.register::<Velocity>()?;
    let lifetime = registry.register::<Lifetime>()?;

    let store = EntityStore::new(config.max_entities, Arc::new(registry));
    let mut scheduler = Scheduler::new(store);

    let clock = WorldClockSystem::new();
    let elapsed = clock.elapsed_handle();
    let glow = GlowRenderSystem::new(position);
    let drawn = glow.drawn_handle();

    scheduler.register_logic(clock);
    scheduler.register_logic(MovementSystem::new(position, velocity));
    scheduler.register_logic(LifetimeSystem::new(lifetime));
    scheduler.register_render(glow);

    // Movers drift along +X and expire over a spread of lifetimes; props
    // just sit there and get drawn.
    for i in 0..MOVER_COUNT {
        let id = scheduler
            .store_mut()
            .create_with(&[position, velocity, lifetime])
            .ok_or("entity store at capacity during spawn")?;
        let entity = scheduler
            .store_mut()
            .get_mut(id)
            .ok_or("freshly created entity missing")?;
        entity
            .component_mut::<Velocity>(velocity)
            .ok_or("mover without velocity")?
            .x = 1.0;
        let spread = (i % 600) as f32 / 60.0;
        entity
            .component_mut::<Lifetime>(lifetime)
            .ok_or("mover without lifetime")?
            .remaining = 1.0 + spread;
    }
    for _ in 0..PROP_COUNT {
        scheduler
            .store_mut()
            .create_with(&[position])
            .ok_or("entity store at capacity during spawn")?;
    }

    let mut game_loop = GameLoop::new(scheduler, &config);
    for _ in 0..FRAMES {
        game_loop.advance(FRAME_DELTA);
    }

    let stats = game_loop.stats();
    let store = game_loop.scheduler().store();
    println!("=== KESTREL headless run ===");
    println!("frames:            {}", game_loop.frames());
    println!("fixed ticks:       {}", stats.ticks_recorded);
    println!("world clock:       {:.2}s", elapsed.get());
    println!("entities alive:    {} / {}", store.count(), store.capacity());
    println!("high-water mark:   {}", store.high_water());
    println!("drawn last frame:  {}", drawn.get());
    println!(
        "frame time:        avg {:.3}ms  min {:.3}ms  max {:.3}ms",
        stats.avg_frame_ms(),
        stats.min_frame_us as f64 / 1000.0,
        stats.max_frame_us as f64 / 1000.0,
    );
    println!("frames over budget: {}", stats.frames_over_budget);

    Ok(())
}
