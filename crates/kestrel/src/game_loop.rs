//! # Frame Loop
//!
//! Drives the scheduler's two passes at their two cadences:
//!
//! ```text
//! Frame N:
//! ┌────────────────────────────────────────────────────────────┐
//! │ 1. Measure delta since last frame (clamped)                │
//! │ 2. accumulator += delta                                    │
//! │ 3. While accumulator >= fixed_dt:                          │
//! │      fixed-step pass (Logic systems, then reclamation)     │
//! │ 4. Render pass, once, with the raw frame delta             │
//! │ 5. Record frame statistics                                 │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fixed-step pass therefore runs zero or more times per rendered
//! frame, always with the same `dt`, while the render pass runs exactly
//! once per frame at whatever rate frames arrive.

use std::time::Instant;

use kestrel_core::Scheduler;

use crate::config::EngineConfig;

/// Largest delta a single frame may contribute to the accumulator.
///
/// Clamping prevents a spiral of death after a pause or debugger stop:
/// without it, one huge delta would queue hundreds of fixed steps.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Timing record for a single frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Fixed-step ticks executed this frame.
    pub ticks: u32,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Time spent in the fixed-step pass(es), microseconds.
    pub logic_us: u64,
    /// Time spent in the render pass, microseconds.
    pub render_us: u64,
    /// Entities reclaimed this frame.
    pub reclaimed: u64,
}

/// The frame loop: owns the scheduler and the fixed-step accumulator.
pub struct GameLoop {
    /// The scheduler being driven.
    scheduler: Scheduler,
    /// Fixed-step delta in seconds, derived from the configured tick rate.
    fixed_dt: f32,
    /// Unconsumed simulation time carried between frames.
    accumulator: f32,
    /// Frame-time budget in microseconds; slower frames are logged.
    budget_us: u64,
    /// Wall-clock instant of the previous `frame()` call.
    last_frame: Option<Instant>,
    /// Frames completed.
    frames: u64,
    /// Accumulated statistics.
    stats: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a frame loop over a scheduler.
    #[must_use]
    pub fn new(scheduler: Scheduler, config: &EngineConfig) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let budget_us = (f64::from(config.max_frame_time_ms) * 1_000.0) as u64;
        Self {
            scheduler,
            fixed_dt: config.fixed_dt(),
            accumulator: 0.0,
            budget_us,
            last_frame: None,
            frames: 0,
            stats: FrameStatsAccumulator::new(),
        }
    }

    /// Returns the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns the scheduler, mutable. For startup population and
    /// between-frame inspection only.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Returns the number of frames completed.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Runs one frame using wall-clock time since the previous call.
    pub fn frame(&mut self) -> FrameStats {
        let now = Instant::now();
        let delta = match self.last_frame.replace(now) {
            Some(previous) => now.duration_since(previous).as_secs_f32(),
            None => self.fixed_dt,
        };
        self.advance(delta)
    }

    /// Runs one frame with an explicit delta. Deterministic; the entry
    /// point tests and headless drivers use.
    pub fn advance(&mut self, delta: f32) -> FrameStats {
        let frame_start = Instant::now();
        let delta = delta.min(MAX_FRAME_DELTA);
        self.accumulator += delta;

        let mut ticks = 0u32;
        let mut reclaimed = 0u64;
        let logic_start = Instant::now();
        while self.accumulator >= self.fixed_dt {
            let pass = self.scheduler.fixed_step(self.fixed_dt);
            reclaimed += pass.reclaimed;
            self.accumulator -= self.fixed_dt;
            ticks += 1;
        }
        let logic_us = micros_since(logic_start);

        let render_start = Instant::now();
        self.scheduler.render(delta);
        let render_us = micros_since(render_start);

        let stats = FrameStats {
            frame: self.frames,
            ticks,
            total_us: micros_since(frame_start),
            logic_us,
            render_us,
            reclaimed,
        };
        self.frames += 1;
        self.stats.record(stats, self.budget_us);

        if stats.total_us > self.budget_us {
            tracing::warn!(
                frame = stats.frame,
                total_us = stats.total_us,
                budget_us = self.budget_us,
                "frame exceeded budget"
            );
        }

        stats
    }
}

#[allow(clippy::cast_possible_truncation)] // frame times fit in u64 micros
fn micros_since(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Total fixed-step ticks recorded.
    pub ticks_recorded: u64,
    /// Sum of total frame times, microseconds.
    pub total_us_sum: u64,
    /// Minimum frame time, microseconds.
    pub min_frame_us: u64,
    /// Maximum frame time, microseconds.
    pub max_frame_us: u64,
    /// Frames that exceeded the configured budget.
    pub frames_over_budget: u64,
}

impl FrameStatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            ticks_recorded: 0,
            total_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records one frame against a budget.
    pub fn record(&mut self, stats: FrameStats, budget_us: u64) {
        self.frames_recorded += 1;
        self.ticks_recorded += u64::from(stats.ticks);
        self.total_us_sum += stats.total_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        if stats.total_us > budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns the average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the average frames per second.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kestrel_core::{ComponentRegistry, EntityStore, Scheduler};

    use super::*;

    fn game_loop(tick_rate_hz: u32) -> GameLoop {
        let registry = Arc::new(ComponentRegistry::new());
        let scheduler = Scheduler::new(EntityStore::new(64, registry));
        let config = EngineConfig {
            tick_rate_hz,
            ..EngineConfig::default()
        };
        GameLoop::new(scheduler, &config)
    }

    #[test]
    fn accumulator_converts_deltas_to_fixed_ticks() {
        let mut loop_ = game_loop(10); // fixed_dt = 0.1s, matches the clamp

        // Half a tick: nothing runs, time is banked.
        let stats = loop_.advance(0.05);
        assert_eq!(stats.ticks, 0);
        assert_eq!(loop_.scheduler().ticks(), 0);

        // The banked half plus another half: exactly one tick.
        let stats = loop_.advance(0.05);
        assert_eq!(stats.ticks, 1);
        assert_eq!(loop_.scheduler().ticks(), 1);
    }

    #[test]
    fn oversized_deltas_are_clamped() {
        let mut loop_ = game_loop(10);

        // Ten seconds of stall must not queue a hundred ticks.
        let stats = loop_.advance(10.0);
        assert_eq!(stats.ticks, 1);
    }

    #[test]
    fn frames_count_independently_of_ticks() {
        let mut loop_ = game_loop(10);
        loop_.advance(0.01);
        loop_.advance(0.01);
        loop_.advance(0.01);
        assert_eq!(loop_.frames(), 3);
        assert_eq!(loop_.scheduler().ticks(), 0);
        assert_eq!(loop_.stats().frames_recorded, 3);
    }
}
