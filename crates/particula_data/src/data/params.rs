use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The twelve tunable physics scalars, addressable by their persisted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhysicsParam {
    TimeScale,
    Friction,
    MaxForce,
    MaxVelocity,
    SeparationDistance,
    AttractionDistance,
    SeparationForce,
    AttractionForce,
    AttractionAttack,
    AttractionDecay,
    AttractionGain,
    SeparationPower,
}

impl PhysicsParam {
    pub const ALL: [PhysicsParam; 12] = [
        PhysicsParam::TimeScale,
        PhysicsParam::Friction,
        PhysicsParam::MaxForce,
        PhysicsParam::MaxVelocity,
        PhysicsParam::SeparationDistance,
        PhysicsParam::AttractionDistance,
        PhysicsParam::SeparationForce,
        PhysicsParam::AttractionForce,
        PhysicsParam::AttractionAttack,
        PhysicsParam::AttractionDecay,
        PhysicsParam::AttractionGain,
        PhysicsParam::SeparationPower,
    ];

    /// Name used in saved configurations and by `set_physics_param`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PhysicsParam::TimeScale => "timeScale",
            PhysicsParam::Friction => "friction",
            PhysicsParam::MaxForce => "maxForce",
            PhysicsParam::MaxVelocity => "maxVelocity",
            PhysicsParam::SeparationDistance => "separationDistance",
            PhysicsParam::AttractionDistance => "attractionDistance",
            PhysicsParam::SeparationForce => "separationForce",
            PhysicsParam::AttractionForce => "attractionForce",
            PhysicsParam::AttractionAttack => "attractionAttack",
            PhysicsParam::AttractionDecay => "attractionDecay",
            PhysicsParam::AttractionGain => "attractionGain",
            PhysicsParam::SeparationPower => "separationPower",
        }
    }

    /// Inclusive valid range.
    #[must_use]
    pub fn range(self) -> (f32, f32) {
        match self {
            PhysicsParam::TimeScale => (0.0, 5.0),
            PhysicsParam::Friction => (0.0, 1.0),
            PhysicsParam::MaxForce => (0.001, 3.0),
            PhysicsParam::MaxVelocity => (0.001, 3.0),
            PhysicsParam::SeparationDistance => (0.01, 16.0),
            PhysicsParam::AttractionDistance => (0.01, 32.0),
            PhysicsParam::SeparationForce => (0.001, 1.0),
            PhysicsParam::AttractionForce => (0.001, 1.0),
            PhysicsParam::AttractionAttack => (0.5, 3.0),
            PhysicsParam::AttractionDecay => (0.5, 3.0),
            PhysicsParam::AttractionGain => (0.5, 5.0),
            PhysicsParam::SeparationPower => (0.1, 12.0),
        }
    }

    #[must_use]
    pub fn contains(self, value: f32) -> bool {
        let (min, max) = self.range();
        value.is_finite() && value >= min && value <= max
    }
}

impl FromStr for PhysicsParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown physics parameter `{s}`"))
    }
}

impl fmt::Display for PhysicsParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
