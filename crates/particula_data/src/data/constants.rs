//! Fixed dimensions of the simulation.

/// Side length of the square, toroidal simulation space.
pub const SPACE_RANGE: f32 = 128.0;

/// Half of [`SPACE_RANGE`]; positions live in `[-HALF_RANGE, HALF_RANGE)`.
pub const HALF_RANGE: f32 = SPACE_RANGE * 0.5;

/// Maximum number of particle types. The weight matrix is always stored at this size.
pub const MAX_TYPES: usize = 8;

/// Number of cells in the stored weight matrix.
pub const WEIGHT_CELLS: usize = MAX_TYPES * MAX_TYPES;

/// Smallest accepted `nbTypes`; the largest is [`MAX_TYPES`].
pub const MIN_TYPES: usize = 2;

/// Default particle budget (power of two).
pub const DEFAULT_PARTICLE_COUNT: usize = 1 << 14;

/// Floor used by every division in the force model.
pub const EPSILON: f32 = 1e-6;

/// Nominal duration of one step, in simulation seconds, before `timeScale`.
pub const BASE_TICK: f32 = 0.02;
