//! # Particula Data
//!
//! Plain data shared by the engine, the I/O layer and any renderer:
//! vectors, particles, response modes, parameter names and the fixed
//! dimensions of the simulation space.

pub mod data;

pub use data::constants::*;
pub use data::particle::Particle;
pub use data::params::PhysicsParam;
pub use data::response::ResponseMode;
pub use glam::Vec2;
