//! External point-force source driven by user input.

use crate::config::PointerConfig;
use crate::error::{Result, SimError};
use crate::space;
use particula_data::{Vec2, EPSILON};

/// Fraction of the gap to the target activation closed each tick.
pub const ACTIVATION_RATE: f32 = 0.1;

/// Activation within this distance of 0 or 1 snaps onto it.
const ACTIVATION_SNAP: f32 = 1e-3;

const FALLOFF_EXPONENT: f32 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct PointerField {
    position: Vec2,
    pressed: bool,
    activation: f32,
    params: PointerConfig,
}

impl PointerField {
    #[must_use]
    pub fn new(params: PointerConfig) -> Self {
        Self {
            position: Vec2::ZERO,
            pressed: false,
            activation: 0.0,
            params,
        }
    }

    pub fn set_params(&mut self, params: PointerConfig) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn params(&self) -> PointerConfig {
        self.params
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Moves the pointer, folding it into the simulation square.
    pub fn set_position(&mut self, x: f32, y: f32) -> Result<()> {
        for (field, value) in [("pointer.x", x), ("pointer.y", y)] {
            if !value.is_finite() {
                return Err(SimError::NonFiniteValue { field, value });
            }
        }
        self.position = space::wrap(Vec2::new(x, y));
        Ok(())
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn activation(&self) -> f32 {
        self.activation
    }

    /// Eases the activation one tick toward 1 while pressed, 0 otherwise.
    pub fn advance(&mut self) {
        let target = if self.pressed { 1.0 } else { 0.0 };
        self.activation += (target - self.activation) * ACTIVATION_RATE;
        if (self.activation - target).abs() < ACTIVATION_SNAP {
            self.activation = target;
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activation > 0.0
    }

    /// Velocity contribution for a particle at `position`.
    #[inline]
    #[must_use]
    pub fn contribution(&self, position: Vec2) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        let dir = space::delta(position, self.position);
        let dist = dir.length();
        let t = (dist / self.params.range.max(EPSILON)).clamp(EPSILON, 1.0 - EPSILON);
        let magnitude = (1.0 - t).powf(FALLOFF_EXPONENT)
            * self.params.attraction
            * self.params.strength
            * self.activation;
        dir * (magnitude / dist.max(EPSILON))
    }
}

impl Default for PointerField {
    fn default() -> Self {
        Self::new(PointerConfig::default())
    }
}
