//! Toroidal geometry of the simulation square.

use particula_data::{Vec2, HALF_RANGE, SPACE_RANGE};

/// Wraps one coordinate into `[-HALF_RANGE, HALF_RANGE)`.
///
/// Non-finite input maps to the origin so a single bad value can never
/// escape the square.
#[inline]
#[must_use]
pub fn wrap_coord(v: f32) -> f32 {
    if !v.is_finite() {
        return 0.0;
    }
    let mut r = (v + HALF_RANGE).rem_euclid(SPACE_RANGE);
    // rem_euclid may round up to exactly SPACE_RANGE for tiny negative inputs
    if r >= SPACE_RANGE {
        r = 0.0;
    }
    r - HALF_RANGE
}

/// Per-axis [`wrap_coord`]. Applied to a position it folds it back into the
/// square; applied to a difference it yields the shortest vector on the torus.
#[inline]
#[must_use]
pub fn wrap(v: Vec2) -> Vec2 {
    Vec2::new(wrap_coord(v.x), wrap_coord(v.y))
}

/// Shortest vector from `from` to `to`.
#[inline]
#[must_use]
pub fn delta(from: Vec2, to: Vec2) -> Vec2 {
    wrap(to - from)
}

#[inline]
#[must_use]
pub fn in_bounds(p: Vec2) -> bool {
    (-HALF_RANGE..HALF_RANGE).contains(&p.x) && (-HALF_RANGE..HALF_RANGE).contains(&p.y)
}
