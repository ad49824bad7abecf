//! Error type for engine operations.
//!
//! Every rejected write returns one of these and leaves the simulation on its
//! previous, valid state.

use particula_data::PhysicsParam;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// `nbTypes` outside `[2, 8]`
    #[error("number of types {0} is outside [2, 8]")]
    InvalidTypeCount(usize),

    /// Single weight write outside the 64-cell grid
    #[error("weight index {0} is outside [0, 64)")]
    WeightIndexOutOfRange(usize),

    /// Bulk weight write with the wrong number of cells
    #[error("expected {expected} weights, got {actual}")]
    WeightLengthMismatch { expected: usize, actual: usize },

    /// Weight value outside `[-1, 1]`
    #[error("weight {value} at index {index} is outside [-1, 1]")]
    WeightOutOfRange { index: usize, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NonFiniteValue { field: &'static str, value: f32 },

    #[error("{param} = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        param: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("response mode {0} is outside [0, 4]")]
    InvalidResponseMode(u8),

    /// Manual weight edit while the noise modulator owns the matrix
    #[error("weight matrix is driven by the noise modulator")]
    NoiseActive,

    #[error("particle buffer has {actual} entries, expected {expected}")]
    ParticleCountMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The receiving simulation was dropped
    #[error("simulation is no longer receiving commands")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn out_of_range(param: PhysicsParam, value: f32) -> Self {
        let (min, max) = param.range();
        Self::ParameterOutOfRange {
            param: param.name(),
            value,
            min,
            max,
        }
    }

    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
