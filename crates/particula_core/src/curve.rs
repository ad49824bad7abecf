//! Distance-shaped force magnitude.
//!
//! Two concentric bands around each particle:
//! - below `separationDistance`: pure repulsion, `-separationForce` at contact
//!   rising to 0 at the band edge, independent of the pair weight
//! - up to `separationDistance + attractionDistance`: a bell-shaped bump
//!   scaled by the pair weight, shaped by attack, decay and gain
//!
//! Beyond both bands the force is zero; callers skip those pairs entirely.

use crate::config::PhysicsConfig;
use particula_data::EPSILON;

/// Symmetric contrast curve on `[0, 1]`. `k = 1` is the identity.
#[inline]
#[must_use]
pub fn gain(x: f32, k: f32) -> f32 {
    if x < 0.5 {
        0.5 * (2.0 * x).powf(k)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - x)).powf(k)
    }
}

/// Normalisation factor making the peak of [`pcurve`] exactly 1.
#[inline]
#[must_use]
pub fn pcurve_norm(a: f32, b: f32) -> f32 {
    let a = a.max(EPSILON);
    let b = b.max(EPSILON);
    (a + b).powf(a + b) / (a.powf(a) * b.powf(b)).max(EPSILON)
}

/// Power bump on `[0, 1]` peaking at `a / (a + b)` with value 1.
#[inline]
#[must_use]
pub fn pcurve(x: f32, a: f32, b: f32) -> f32 {
    pcurve_norm(a, b) * x.powf(a) * (1.0 - x).powf(b)
}

/// Physics scalars of the curve, with the normalisation precomputed once per
/// tick instead of once per pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceCurve {
    separation_distance: f32,
    separation_force: f32,
    separation_power: f32,
    attraction_distance: f32,
    attraction_force: f32,
    attack: f32,
    decay: f32,
    gain: f32,
    norm: f32,
    max_distance: f32,
}

impl ForceCurve {
    #[must_use]
    pub fn new(physics: &PhysicsConfig) -> Self {
        Self {
            separation_distance: physics.separation_distance.max(EPSILON),
            separation_force: physics.separation_force,
            separation_power: physics.separation_power,
            attraction_distance: physics.attraction_distance.max(EPSILON),
            attraction_force: physics.attraction_force,
            attack: physics.attraction_attack,
            decay: physics.attraction_decay,
            gain: physics.attraction_gain,
            norm: pcurve_norm(physics.attraction_attack, physics.attraction_decay),
            max_distance: physics.separation_distance + physics.attraction_distance,
        }
    }

    /// Interaction cutoff `separationDistance + attractionDistance`.
    #[inline]
    #[must_use]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Signed force magnitude for a pair at distance `len` with weight `w`.
    /// Negative pushes apart, positive pulls together.
    #[inline]
    #[must_use]
    pub fn eval(&self, w: f32, len: f32) -> f32 {
        let d = len.min(self.max_distance);
        if d < self.separation_distance {
            let ratio = d / self.separation_distance;
            self.separation_force * (ratio.powf(self.separation_power) - 1.0)
        } else {
            let f = ((d - self.separation_distance) / self.attraction_distance)
                .clamp(0.0, 1.0 - EPSILON);
            let shaped = gain(f, self.gain);
            let bump = self.norm * shaped.powf(self.attack) * (1.0 - shaped).powf(self.decay);
            self.attraction_force * w * bump
        }
    }

    /// `n` evenly spaced `(distance, force)` samples over `[0, max_distance]`
    /// for a unit weight.
    #[must_use]
    pub fn samples(&self, n: usize) -> Vec<(f32, f32)> {
        match n {
            0 => Vec::new(),
            1 => vec![(0.0, self.eval(1.0, 0.0))],
            _ => {
                let step = self.max_distance / (n - 1) as f32;
                (0..n)
                    .map(|i| {
                        let d = step * i as f32;
                        (d, self.eval(1.0, d))
                    })
                    .collect()
            }
        }
    }
}
