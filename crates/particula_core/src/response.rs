//! Response modes: turning a scalar curve force into a vector.
//!
//! The mode is global for a tick, so the function is looked up once from
//! [`RESPONSE_TABLE`] and called for every pair without branching on the mode.

use particula_data::{ResponseMode, Vec2, EPSILON};
use std::f32::consts::PI;

/// `(weight, delta, |delta|, force) -> vector contribution`
pub type ResponseFn = fn(f32, Vec2, f32, f32) -> Vec2;

/// Indexed by [`ResponseMode::index`].
pub const RESPONSE_TABLE: [ResponseFn; 5] = [
    linear,
    quadratic,
    cubic,
    rotational_perp,
    rotational_angle,
];

#[inline]
#[must_use]
pub fn response_fn(mode: ResponseMode) -> ResponseFn {
    RESPONSE_TABLE[mode.index() as usize]
}

fn linear(_w: f32, delta: Vec2, len: f32, force: f32) -> Vec2 {
    delta * (force / len.max(EPSILON))
}

fn quadratic(_w: f32, delta: Vec2, len: f32, force: f32) -> Vec2 {
    delta * (force / (len * len).max(EPSILON))
}

fn cubic(_w: f32, delta: Vec2, len: f32, force: f32) -> Vec2 {
    delta * (force / (len * len * len).max(EPSILON))
}

fn rotational_perp(_w: f32, delta: Vec2, len: f32, force: f32) -> Vec2 {
    delta.perp() * (force / len.max(EPSILON))
}

fn rotational_angle(w: f32, delta: Vec2, len: f32, force: f32) -> Vec2 {
    let (sin, cos) = (-w * PI).sin_cos();
    let rotated = Vec2::new(
        delta.x * cos + delta.y * sin,
        -delta.x * sin + delta.y * cos,
    );
    rotated * (force / len.max(EPSILON))
}
