//! All-pairs force pass.
//!
//! Each particle's accumulator depends only on the frozen particle snapshot
//! and the per-tick [`KernelContext`], so the pass parallelises per particle
//! with no shared writes.

use crate::config::PhysicsConfig;
use crate::curve::ForceCurve;
use crate::response::{response_fn, ResponseFn};
use crate::space;
use crate::weights::WeightMatrix;
use particula_data::{Particle, ResponseMode, Vec2};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything the force pass reads besides the particles, resolved once per
/// tick.
#[derive(Clone, Copy)]
pub struct KernelContext<'a> {
    pub weights: &'a WeightMatrix,
    pub curve: ForceCurve,
    pub response: ResponseFn,
    pub nb_types: usize,
    pub max_force: f32,
}

impl<'a> KernelContext<'a> {
    #[must_use]
    pub fn new(
        physics: &PhysicsConfig,
        weights: &'a WeightMatrix,
        nb_types: usize,
        mode: ResponseMode,
    ) -> Self {
        debug_assert!(nb_types > 0, "nb_types must never be zero");
        Self {
            weights,
            curve: ForceCurve::new(physics),
            response: response_fn(mode),
            nb_types,
            max_force: physics.max_force,
        }
    }

    /// Net force on particle `i`, clamped to `maxForce`.
    #[must_use]
    pub fn force_on(&self, i: usize, particles: &[Particle]) -> Vec2 {
        let origin = particles[i].position;
        let own_type = Particle::type_of(i, self.nb_types);
        let max_distance = self.curve.max_distance();
        let max_sq = max_distance * max_distance;

        let mut acc = Vec2::ZERO;
        for (j, other) in particles.iter().enumerate() {
            if j == i {
                continue;
            }
            let delta = space::delta(origin, other.position);
            let len_sq = delta.length_squared();
            if len_sq > max_sq {
                continue;
            }
            let len = len_sq.sqrt();
            let w = self
                .weights
                .get(own_type, Particle::type_of(j, self.nb_types));
            let force = self.curve.eval(w, len);
            acc += (self.response)(w, delta, len, force);
        }
        let acc = acc.clamp_length_max(self.max_force);
        debug_assert!(acc.is_finite(), "non-finite force on particle {i}");
        acc
    }
}

/// Fills `forces[i]` with the net force on `particles[i]`.
pub fn compute_forces(ctx: &KernelContext<'_>, particles: &[Particle], forces: &mut [Vec2]) {
    debug_assert_eq!(particles.len(), forces.len());

    #[cfg(feature = "parallel")]
    forces
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, force)| *force = ctx.force_on(i, particles));

    #[cfg(not(feature = "parallel"))]
    forces
        .iter_mut()
        .enumerate()
        .for_each(|(i, force)| *force = ctx.force_on(i, particles));
}
