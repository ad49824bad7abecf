//! Configuration model for the simulation.
//!
//! Mirrors the persisted document of the application verbatim: four groups
//! (`physics`, `attraction`, `appearance`, `pointer`) with camelCase keys.
//! Presets and saved files use this same schema.
//!
//! ## Example
//!
//! ```json
//! {
//!   "physics": { "timeScale": 1.0, "friction": 0.25, "maxForce": 0.5 },
//!   "attraction": { "nbTypes": 4, "response": 0, "useNoise": false },
//!   "pointer": { "attraction": 0.5, "strength": 3.0, "range": 16.0 }
//! }
//! ```
//!
//! Missing fields fall back to their defaults, so partial documents load.

use crate::error::{Result, SimError};
use particula_data::{PhysicsParam, ResponseMode, MAX_TYPES, MIN_TYPES, WEIGHT_CELLS};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Valid range of `noiseTimeScale`.
pub const NOISE_TIME_SCALE_RANGE: (f32, f32) = (0.0, 2.0);
/// Valid range of `noiseFrequency`.
pub const NOISE_FREQUENCY_RANGE: (f32, f32) = (0.01, 2.0);
/// Valid range of `noiseAmplitude`.
pub const NOISE_AMPLITUDE_RANGE: (f32, f32) = (0.01, 1.0);

pub const POINTER_ATTRACTION_RANGE: (f32, f32) = (-1.0, 1.0);
pub const POINTER_STRENGTH_RANGE: (f32, f32) = (0.0, 10.0);
pub const POINTER_RANGE_RANGE: (f32, f32) = (0.0, 32.0);

/// The twelve scalars shaping the force curve and the integrator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsConfig {
    pub time_scale: f32,
    pub friction: f32,
    pub max_force: f32,
    pub max_velocity: f32,
    pub separation_distance: f32,
    pub attraction_distance: f32,
    pub separation_force: f32,
    pub attraction_force: f32,
    pub attraction_attack: f32,
    pub attraction_decay: f32,
    pub attraction_gain: f32,
    pub separation_power: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            friction: 0.25,
            max_force: 0.5,
            max_velocity: 0.5,
            separation_distance: 1.0,
            attraction_distance: 5.0,
            separation_force: 0.5,
            attraction_force: 0.5,
            attraction_attack: 1.0,
            attraction_decay: 1.0,
            attraction_gain: 1.0,
            separation_power: 1.0,
        }
    }
}

impl PhysicsConfig {
    #[must_use]
    pub fn get(&self, param: PhysicsParam) -> f32 {
        match param {
            PhysicsParam::TimeScale => self.time_scale,
            PhysicsParam::Friction => self.friction,
            PhysicsParam::MaxForce => self.max_force,
            PhysicsParam::MaxVelocity => self.max_velocity,
            PhysicsParam::SeparationDistance => self.separation_distance,
            PhysicsParam::AttractionDistance => self.attraction_distance,
            PhysicsParam::SeparationForce => self.separation_force,
            PhysicsParam::AttractionForce => self.attraction_force,
            PhysicsParam::AttractionAttack => self.attraction_attack,
            PhysicsParam::AttractionDecay => self.attraction_decay,
            PhysicsParam::AttractionGain => self.attraction_gain,
            PhysicsParam::SeparationPower => self.separation_power,
        }
    }

    fn slot(&mut self, param: PhysicsParam) -> &mut f32 {
        match param {
            PhysicsParam::TimeScale => &mut self.time_scale,
            PhysicsParam::Friction => &mut self.friction,
            PhysicsParam::MaxForce => &mut self.max_force,
            PhysicsParam::MaxVelocity => &mut self.max_velocity,
            PhysicsParam::SeparationDistance => &mut self.separation_distance,
            PhysicsParam::AttractionDistance => &mut self.attraction_distance,
            PhysicsParam::SeparationForce => &mut self.separation_force,
            PhysicsParam::AttractionForce => &mut self.attraction_force,
            PhysicsParam::AttractionAttack => &mut self.attraction_attack,
            PhysicsParam::AttractionDecay => &mut self.attraction_decay,
            PhysicsParam::AttractionGain => &mut self.attraction_gain,
            PhysicsParam::SeparationPower => &mut self.separation_power,
        }
    }

    /// Writes one parameter. Out-of-range or non-finite values are rejected
    /// and the previous value is kept.
    pub fn set(&mut self, param: PhysicsParam, value: f32) -> Result<()> {
        if !param.contains(value) {
            return Err(SimError::out_of_range(param, value));
        }
        *self.slot(param) = value;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for param in PhysicsParam::ALL {
            let value = self.get(param);
            if !param.contains(value) {
                return Err(SimError::out_of_range(param, value));
            }
        }
        Ok(())
    }

    /// Picks random values for every parameter except `timeScale`.
    ///
    /// Draws follow the "randomize sliders" spreads of the editor; the result
    /// is clamped into each parameter's valid range.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let draws = [
            (PhysicsParam::Friction, rng.gen::<f32>() * 0.5),
            (PhysicsParam::MaxForce, rng.gen::<f32>() * 3.0),
            (PhysicsParam::MaxVelocity, rng.gen::<f32>() * 3.0),
            (PhysicsParam::SeparationDistance, rng.gen::<f32>() * 16.0),
            (PhysicsParam::AttractionDistance, rng.gen::<f32>() * 32.0),
            (PhysicsParam::SeparationForce, rng.gen::<f32>()),
            (PhysicsParam::AttractionForce, rng.gen::<f32>()),
            (PhysicsParam::AttractionAttack, rng.gen::<f32>() * 2.0 + 0.5),
            (PhysicsParam::AttractionDecay, rng.gen::<f32>() * 2.0 + 0.5),
            (PhysicsParam::AttractionGain, rng.gen::<f32>() * 4.0 + 0.5),
            (PhysicsParam::SeparationPower, rng.gen::<f32>() * 12.0 + 0.1),
        ];
        for (param, value) in draws {
            let (min, max) = param.range();
            *self.slot(param) = value.clamp(min, max);
        }
    }
}

/// Type interactions: type count, the 8×8 weight grid, response mode and the
/// noise animation settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AttractionConfig {
    pub nb_types: usize,
    pub values: Vec<f32>,
    pub response: ResponseMode,
    pub use_noise: bool,
    pub noise_time_scale: f32,
    pub noise_frequency: f32,
    pub noise_amplitude: f32,
}

impl Default for AttractionConfig {
    fn default() -> Self {
        Self {
            nb_types: 4,
            values: vec![0.0; WEIGHT_CELLS],
            response: ResponseMode::Linear,
            use_noise: false,
            noise_time_scale: 1.0,
            noise_frequency: 0.5,
            noise_amplitude: 0.5,
        }
    }
}

impl AttractionConfig {
    pub fn validate(&self) -> Result<()> {
        validate_nb_types(self.nb_types)?;
        validate_weights(&self.values)?;
        for (field, value) in [
            ("noiseTimeScale", self.noise_time_scale),
            ("noiseFrequency", self.noise_frequency),
            ("noiseAmplitude", self.noise_amplitude),
        ] {
            if !value.is_finite() {
                return Err(SimError::NonFiniteValue { field, value });
            }
        }
        Ok(())
    }

    /// Clamps the noise parameters into their documented ranges.
    pub fn clamp_noise(&mut self) {
        self.noise_time_scale = self
            .noise_time_scale
            .clamp(NOISE_TIME_SCALE_RANGE.0, NOISE_TIME_SCALE_RANGE.1);
        self.noise_frequency = self
            .noise_frequency
            .clamp(NOISE_FREQUENCY_RANGE.0, NOISE_FREQUENCY_RANGE.1);
        self.noise_amplitude = self
            .noise_amplitude
            .clamp(NOISE_AMPLITUDE_RANGE.0, NOISE_AMPLITUDE_RANGE.1);
    }
}

/// Rendering settings. The engine never reads these; they are carried so a
/// saved document survives a load/save cycle unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearanceConfig {
    pub palette: String,
    pub shape: u32,
    pub particle_size: f32,
    pub particle_smoothness: f32,
    pub vel_to_size: bool,
    pub vel_to_alpha: bool,
    pub orient_to_vel: bool,
    pub make_anular: bool,
    pub additive: bool,
    pub custom_colors: [u32; MAX_TYPES],
    pub custom_background_color: u32,
    pub custom_frame_color: u32,
    pub after_image: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            palette: "DefaultLight".to_string(),
            shape: 0,
            particle_size: 0.1,
            particle_smoothness: 0.1,
            vel_to_size: false,
            vel_to_alpha: false,
            orient_to_vel: true,
            make_anular: false,
            additive: false,
            custom_colors: [0x000000; MAX_TYPES],
            custom_background_color: 0xffffff,
            custom_frame_color: 0x000000,
            after_image: false,
        }
    }
}

/// External point-force settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PointerConfig {
    pub attraction: f32,
    pub strength: f32,
    pub range: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            attraction: 0.5,
            strength: 3.0,
            range: 16.0,
        }
    }
}

impl PointerConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("pointer.attraction", self.attraction, POINTER_ATTRACTION_RANGE)?;
        check_range("pointer.strength", self.strength, POINTER_STRENGTH_RANGE)?;
        check_range("pointer.range", self.range, POINTER_RANGE_RANGE)
    }
}

/// The full, serializable simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub attraction: AttractionConfig,
    pub appearance: AppearanceConfig,
    pub pointer: PointerConfig,
}

impl SimConfig {
    /// Defaults with uniform(-1, 1) weights, as a fresh session starts.
    pub fn default_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut config = Self::default();
        for v in &mut config.attraction.values {
            *v = rng.gen_range(-1.0..=1.0);
        }
        config
    }

    /// Validates all configuration parameters.
    ///
    /// Returns the first failure found. Noise parameters are not range
    /// checked here; [`SimConfig::normalized`] clamps them instead.
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;
        self.attraction.validate()?;
        self.pointer.validate()?;
        Ok(())
    }

    /// Returns a copy with the noise parameters clamped into range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.attraction.clamp_noise();
        self
    }

    /// SHA-256 of the groups that influence the dynamics.
    ///
    /// Two configs with the same fingerprint drive identical simulations
    /// given the same seed; appearance changes do not alter it.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&self.physics).unwrap_or_default());
        hasher.update(serde_json::to_vec(&self.attraction).unwrap_or_default());
        hex::encode(hasher.finalize())
    }
}

pub fn validate_nb_types(nb_types: usize) -> Result<()> {
    if (MIN_TYPES..=MAX_TYPES).contains(&nb_types) {
        Ok(())
    } else {
        Err(SimError::InvalidTypeCount(nb_types))
    }
}

pub fn validate_weight(index: usize, value: f32) -> Result<()> {
    if index >= WEIGHT_CELLS {
        return Err(SimError::WeightIndexOutOfRange(index));
    }
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(SimError::WeightOutOfRange { index, value });
    }
    Ok(())
}

pub fn validate_weights(values: &[f32]) -> Result<()> {
    if values.len() != WEIGHT_CELLS {
        return Err(SimError::WeightLengthMismatch {
            expected: WEIGHT_CELLS,
            actual: values.len(),
        });
    }
    values
        .iter()
        .enumerate()
        .try_for_each(|(i, &v)| validate_weight(i, v))
}

fn check_range(param: &'static str, value: f32, (min, max): (f32, f32)) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SimError::ParameterOutOfRange {
            param,
            value,
            min,
            max,
        })
    }
}
