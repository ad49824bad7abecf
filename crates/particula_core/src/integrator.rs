//! Velocity and position update.
//!
//! Per particle: `v += F·dt`, `v *= 1 - friction`, clamp `|v|` to
//! `maxVelocity`, then add the pointer contribution without re-clamping,
//! `p += v·dt`, wrap `p` into the square.

use crate::pointer::PointerField;
use crate::space;
use particula_data::{Particle, Vec2};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Clone, Copy)]
pub struct IntegratorContext<'a> {
    pub dt: f32,
    pub friction: f32,
    pub max_velocity: f32,
    pub pointer: &'a PointerField,
}

impl IntegratorContext<'_> {
    #[inline]
    #[must_use]
    pub fn step(&self, particle: &Particle, force: Vec2) -> Particle {
        let mut velocity = particle.velocity + force * self.dt;
        velocity *= 1.0 - self.friction;
        velocity = velocity.clamp_length_max(self.max_velocity);
        // pointer push may exceed max_velocity; friction bleeds it off later
        velocity += self.pointer.contribution(particle.position);
        let position = space::wrap(particle.position + velocity * self.dt);
        Particle { position, velocity }
    }
}

/// Writes `next[i]` from `current[i]` and `forces[i]`.
pub fn integrate(
    ctx: &IntegratorContext<'_>,
    current: &[Particle],
    forces: &[Vec2],
    next: &mut [Particle],
) {
    debug_assert_eq!(current.len(), forces.len());
    debug_assert_eq!(current.len(), next.len());

    #[cfg(feature = "parallel")]
    next.par_iter_mut()
        .zip(current.par_iter().zip(forces.par_iter()))
        .for_each(|(out, (particle, &force))| *out = ctx.step(particle, force));

    #[cfg(not(feature = "parallel"))]
    next.iter_mut()
        .zip(current.iter().zip(forces.iter()))
        .for_each(|(out, (particle, &force))| *out = ctx.step(particle, force));
}

#[cfg(test)]
mod tests {
    use super::*;
    use particula_data::HALF_RANGE;

    fn ctx(pointer: &PointerField) -> IntegratorContext<'_> {
        IntegratorContext {
            dt: 0.1,
            friction: 0.5,
            max_velocity: 1.0,
            pointer,
        }
    }

    #[test]
    fn test_step_order() {
        let pointer = PointerField::default();
        let p = Particle::at(Vec2::ZERO);
        let next = ctx(&pointer).step(&p, Vec2::new(4.0, 0.0));
        // (0 + 4·0.1) · 0.5 = 0.2
        assert!((next.velocity.x - 0.2).abs() < 1e-6);
        assert!((next.position.x - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_clamped() {
        let pointer = PointerField::default();
        let p = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::new(30.0, 40.0),
        };
        let next = ctx(&pointer).step(&p, Vec2::ZERO);
        assert!((next.velocity.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_added_after_clamp() {
        let mut pointer = PointerField::default();
        pointer.set_position(1.0, 0.0).unwrap();
        pointer.set_pressed(true);
        for _ in 0..100 {
            pointer.advance();
        }
        let p = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::new(10.0, 0.0),
        };
        let next = ctx(&pointer).step(&p, Vec2::ZERO);
        assert!(next.velocity.x > 1.0);
    }

    #[test]
    fn test_position_wraps() {
        let pointer = PointerField::default();
        let p = Particle {
            position: Vec2::new(HALF_RANGE - 0.01, 0.0),
            velocity: Vec2::new(2.0, 0.0),
        };
        let next = ctx(&pointer).step(&p, Vec2::ZERO);
        assert!(next.position.x < 0.0);
        assert!(next.position.x >= -HALF_RANGE);
    }

    #[test]
    fn test_integrate_buffers() {
        let pointer = PointerField::default();
        let current = vec![Particle::at(Vec2::ZERO); 3];
        let forces = vec![Vec2::new(0.0, 2.0); 3];
        let mut next = vec![Particle::default(); 3];
        integrate(&ctx(&pointer), &current, &forces, &mut next);
        assert!(next.iter().all(|p| p.velocity.y > 0.0));
        assert!(current.iter().all(|p| p.velocity == Vec2::ZERO));
    }
}
