//! # Particula
//!
//! Particle-life simulation: typed particles attract and repel each other
//! according to a signed weight grid, producing life-like emergent patterns.
//!
//! The engine lives in [`particula_core`], plain data in [`particula_data`]
//! and file handling in [`particula_io`]. This crate adds the headless
//! [`app`] runner used by the `particula` binary.

pub mod app;

pub use particula_core::{
    CommandSender, Result, SimCommand, SimConfig, SimError, SimOptions, SimSnapshot, Simulation,
};
pub use particula_data::{Particle, PhysicsParam, ResponseMode, Vec2};
