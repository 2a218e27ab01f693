//! # KESTREL Engine Shell
//!
//! The frame loop around the dispatch kernel ([`kestrel_core`]):
//!
//! - [`config`] - engine configuration, parsed from TOML once at startup
//! - [`game_loop`] - fixed-step accumulator plus variable-rate render pass
//! - [`gameplay`] - demo components and systems exercising every dispatch
//!   path
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml("kestrel.toml")?;
//! let mut loop_ = GameLoop::new(scheduler, &config);
//! loop {
//!     loop_.frame();
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod game_loop;
pub mod gameplay;

pub use kestrel_core as core;

pub use config::{ConfigError, EngineConfig};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop};
