//! # Particula Core
//!
//! The simulation engine for Particula, a particle-life toy: typed particles
//! pull and push each other according to a signed type-to-type weight grid,
//! and life-like structures emerge.
//!
//! This crate contains:
//! - The configuration model and its validation
//! - The distance-shaped force curve and the response modes
//! - The weight grid and its noise-driven animation
//! - The pointer force field
//! - The all-pairs force pass and the integrator over a toroidal square
//! - The simulation context, commands, snapshots and metrics
//!
//! ## Architecture
//!
//! - **Double buffering**: the force pass reads a frozen particle buffer and
//!   the integrator writes a second one, swapped after each tick
//! - **Parallel processing**: Rayon-powered per-particle passes (feature `parallel`)
//! - **Deterministic simulation**: seeded `ChaCha8Rng` for reproducible runs
//!
//! ## Example
//!
//! ```
//! use particula_core::config::SimConfig;
//! use particula_core::engine::{SimOptions, Simulation};
//!
//! let options = SimOptions {
//!     particle_count: 256,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(SimConfig::default(), options).unwrap();
//! sim.set_single_weight(1, 0.8).unwrap();
//! for _ in 0..10 {
//!     sim.tick(1.0 / 60.0);
//! }
//! assert_eq!(sim.snapshot().positions.len(), 256);
//! ```

/// Commands and the cross-thread command handle
pub mod commands;
/// Configuration model, validation and fingerprinting
pub mod config;
/// Force magnitude as a function of distance
pub mod curve;
/// The simulation context and its tick loop
pub mod engine;
pub mod error;
pub mod integrator;
/// Per-particle force accumulation
pub mod kernel;
/// Tick metrics and logging setup
pub mod metrics;
/// Procedural weight animation
pub mod noise;
pub mod particles;
pub mod pointer;
/// Response-mode dispatch table
pub mod response;
pub mod snapshot;
/// Toroidal wrap helpers
pub mod space;
pub mod weights;

pub use commands::{CommandSender, SimCommand};
pub use config::SimConfig;
pub use engine::{SimOptions, Simulation};
pub use error::{Result, SimError};
pub use snapshot::SimSnapshot;
