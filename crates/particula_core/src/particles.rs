//! Double-buffered particle state.
//!
//! The force pass reads the front buffer and writes one accumulator per
//! particle; the integrator reads front + accumulators and writes the back
//! buffer; [`ParticleSet::swap`] publishes the result. No pass ever mutates
//! the buffer another particle is reading.

use crate::error::{Result, SimError};
use crate::space;
use particula_data::{Particle, Vec2, HALF_RANGE};
use rand::Rng;

/// Distance kept from the square's edges when scattering particles.
///
/// Larger than the force epsilon because `64.0 - 1e-6` rounds back to `64.0`
/// in `f32`.
pub const POSITION_MARGIN: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct ParticleSet {
    front: Vec<Particle>,
    back: Vec<Particle>,
    forces: Vec<Vec2>,
}

/// Mutable views handed to one step: read-only state, accumulators and the
/// output buffer.
pub struct StepBuffers<'a> {
    pub current: &'a [Particle],
    pub forces: &'a mut [Vec2],
    pub next: &'a mut [Particle],
}

impl ParticleSet {
    /// Allocates `count` particles scattered uniformly over the square.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut set = Self {
            front: vec![Particle::default(); count],
            back: vec![Particle::default(); count],
            forces: vec![Vec2::ZERO; count],
        };
        set.randomize(rng);
        set
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.front.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    /// Current, committed particle state.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.front
    }

    /// Force accumulators written by the last force pass.
    #[must_use]
    pub fn forces(&self) -> &[Vec2] {
        &self.forces
    }

    /// Re-scatters positions and zeroes velocities and accumulators.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let extent = HALF_RANGE - POSITION_MARGIN;
        for p in &mut self.front {
            let position = Vec2::new(
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
            );
            *p = Particle::at(space::wrap(position));
        }
        self.back.copy_from_slice(&self.front);
        self.forces.fill(Vec2::ZERO);
    }

    /// Replaces the state wholesale, e.g. from an exported snapshot.
    ///
    /// Positions are folded back into the square; non-finite velocities are
    /// zeroed.
    pub fn load(&mut self, particles: Vec<Particle>) -> Result<()> {
        if particles.len() != self.front.len() {
            return Err(SimError::ParticleCountMismatch {
                expected: self.front.len(),
                actual: particles.len(),
            });
        }
        self.front = particles;
        for p in &mut self.front {
            if !space::in_bounds(p.position) {
                p.position = space::wrap(p.position);
            }
            if !p.velocity.is_finite() {
                p.velocity = Vec2::ZERO;
            }
        }
        self.back.copy_from_slice(&self.front);
        self.forces.fill(Vec2::ZERO);
        Ok(())
    }

    pub fn step_buffers(&mut self) -> StepBuffers<'_> {
        debug_assert_eq!(self.front.len(), self.back.len());
        debug_assert_eq!(self.front.len(), self.forces.len());
        StepBuffers {
            current: &self.front,
            forces: &mut self.forces,
            next: &mut self.back,
        }
    }

    /// Publishes the back buffer written by the integrator.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_particles_in_bounds_and_still() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let set = ParticleSet::new(1024, &mut rng);
        assert_eq!(set.len(), 1024);
        for p in set.particles() {
            assert!(space::in_bounds(p.position));
            assert!(p.position.x.abs() <= HALF_RANGE - POSITION_MARGIN);
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = ParticleSet::new(64, &mut ChaCha8Rng::seed_from_u64(5));
        let b = ParticleSet::new(64, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_load_wraps_and_checks_length() {
        let mut set = ParticleSet::new(2, &mut ChaCha8Rng::seed_from_u64(0));
        assert!(set.load(vec![Particle::default()]).is_err());

        let loaded = vec![
            Particle {
                position: Vec2::new(70.0, 0.0),
                velocity: Vec2::new(f32::NAN, 0.0),
            },
            Particle::at(Vec2::new(1.0, 2.0)),
        ];
        set.load(loaded).unwrap();
        assert_eq!(set.particles()[0].position, Vec2::new(-58.0, 0.0));
        assert_eq!(set.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_swap_publishes_back_buffer() {
        let mut set = ParticleSet::new(1, &mut ChaCha8Rng::seed_from_u64(0));
        {
            let buffers = set.step_buffers();
            buffers.next[0] = Particle::at(Vec2::new(9.0, 9.0));
        }
        assert_ne!(set.particles()[0].position, Vec2::new(9.0, 9.0));
        set.swap();
        assert_eq!(set.particles()[0].position, Vec2::new(9.0, 9.0));
    }
}
