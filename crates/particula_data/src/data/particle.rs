use glam::Vec2;
use serde::{Deserialize, Serialize};

/// State of a single particle.
///
/// The particle's type is not stored: it is `index % nb_types`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Particle {
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    /// Type label of the particle stored at `index`.
    #[inline]
    #[must_use]
    pub fn type_of(index: usize, nb_types: usize) -> usize {
        debug_assert!(nb_types > 0, "nb_types must never be zero");
        index % nb_types
    }
}
