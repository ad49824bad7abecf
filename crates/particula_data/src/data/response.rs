use serde::{Deserialize, Serialize};
use std::fmt;

/// How a scalar curve force and the separation vector become a force vector.
///
/// Serialized as its integer index, matching the `attraction.response` field
/// of saved configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResponseMode {
    #[default]
    Linear,
    Quadratic,
    Cubic,
    RotationalPerp,
    RotationalAngle,
}

impl ResponseMode {
    pub const ALL: [ResponseMode; 5] = [
        ResponseMode::Linear,
        ResponseMode::Quadratic,
        ResponseMode::Cubic,
        ResponseMode::RotationalPerp,
        ResponseMode::RotationalAngle,
    ];

    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ResponseMode::Linear => "Linear",
            ResponseMode::Quadratic => "Quadratic",
            ResponseMode::Cubic => "Cubic",
            ResponseMode::RotationalPerp => "Rotational",
            ResponseMode::RotationalAngle => "Rotational angle",
        }
    }
}

impl TryFrom<u8> for ResponseMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("response mode {value} is not in [0, 4]"))
    }
}

impl From<ResponseMode> for u8 {
    fn from(mode: ResponseMode) -> u8 {
        mode.index()
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
