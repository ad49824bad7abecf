//! Procedural animation of the weight matrix.
//!
//! A seeded, hash-based 2D value noise with two octaves. The grid is sampled
//! with rows scrolling through time:
//!
//! `cell[row][col] = noise((row + elapsed * timeScale) * frequency, col * frequency) * amplitude`
//!
//! so the generated matrix is a pure function of its inputs.

use crate::config::{
    AttractionConfig, NOISE_AMPLITUDE_RANGE, NOISE_FREQUENCY_RANGE, NOISE_TIME_SCALE_RANGE,
};
use particula_data::{MAX_TYPES, WEIGHT_CELLS};

/// Default seed of the noise lattice.
pub const DEFAULT_NOISE_SEED: u64 = 0x5eed;

const OCTAVES: u32 = 2;
const PERSISTENCE: f32 = 0.5;
const LACUNARITY: f32 = 2.0;

/// Fractal value noise on an integer lattice, output in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueNoise {
    seed: u64,
}

impl ValueNoise {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        for octave in 0..OCTAVES {
            let seed = self.seed.wrapping_add(u64::from(octave));
            sum += amp * (Self::lattice(x * freq, y * freq, seed) * 2.0 - 1.0);
            norm += amp;
            amp *= PERSISTENCE;
            freq *= LACUNARITY;
        }
        (sum / norm).clamp(-1.0, 1.0)
    }

    /// Smoothstep-interpolated lattice value in `[0, 1]`.
    fn lattice(x: f32, y: f32, seed: u64) -> f32 {
        let (x0, y0) = (x.floor(), y.floor());
        let ix = x0 as i32;
        let iy = y0 as i32;
        let fx = x - x0;
        let fy = y - y0;
        let ux = fx * fx * (3.0 - 2.0 * fx);
        let uy = fy * fy * (3.0 - 2.0 * fy);
        let v00 = Self::hash(ix, iy, seed);
        let v10 = Self::hash(ix.wrapping_add(1), iy, seed);
        let v01 = Self::hash(ix, iy.wrapping_add(1), seed);
        let v11 = Self::hash(ix.wrapping_add(1), iy.wrapping_add(1), seed);
        let v0 = v00 + ux * (v10 - v00);
        let v1 = v01 + ux * (v11 - v01);
        v0 + uy * (v1 - v0)
    }

    fn hash(x: i32, y: i32, seed: u64) -> f32 {
        let n = (x.wrapping_mul(127) ^ y.wrapping_mul(311)) as u64 ^ seed;
        let n = n.wrapping_mul(0x517cc1b727220a95);
        let n = n ^ (n >> 32);
        (n & 0xFFFFFF) as f32 / 0xFFFFFF as f32
    }
}

/// Noise settings plus the lattice that produces the animated matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseModulator {
    noise: ValueNoise,
    enabled: bool,
    time_scale: f32,
    frequency: f32,
    amplitude: f32,
}

impl NoiseModulator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let defaults = AttractionConfig::default();
        let mut modulator = Self {
            noise: ValueNoise::new(seed),
            enabled: false,
            time_scale: 0.0,
            frequency: 0.0,
            amplitude: 0.0,
        };
        modulator.set_params(
            defaults.noise_time_scale,
            defaults.noise_frequency,
            defaults.noise_amplitude,
        );
        modulator
    }

    #[must_use]
    pub fn from_config(config: &AttractionConfig, seed: u64) -> Self {
        let mut modulator = Self::new(seed);
        modulator.enabled = config.use_noise;
        modulator.set_params(
            config.noise_time_scale,
            config.noise_frequency,
            config.noise_amplitude,
        );
        modulator
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Stores the parameters clamped into range. Non-finite values keep the
    /// current setting.
    pub fn set_params(&mut self, time_scale: f32, frequency: f32, amplitude: f32) {
        fn clamp_into(current: f32, value: f32, (min, max): (f32, f32)) -> f32 {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                current
            }
        }
        self.time_scale = clamp_into(self.time_scale, time_scale, NOISE_TIME_SCALE_RANGE);
        self.frequency = clamp_into(self.frequency, frequency, NOISE_FREQUENCY_RANGE);
        self.amplitude = clamp_into(self.amplitude, amplitude, NOISE_AMPLITUDE_RANGE);
    }

    /// `(timeScale, frequency, amplitude)` as currently applied.
    #[must_use]
    pub fn params(&self) -> (f32, f32, f32) {
        (self.time_scale, self.frequency, self.amplitude)
    }

    /// Generates the full 64-cell matrix for the given simulation time.
    ///
    /// The phase is formed in `f64` and rounded once, so long sessions keep
    /// advancing smoothly.
    #[must_use]
    pub fn generate(&self, elapsed: f64) -> Box<[f32; WEIGHT_CELLS]> {
        let mut cells = Box::new([0.0; WEIGHT_CELLS]);
        let phase = (elapsed * f64::from(self.time_scale)) as f32;
        for row in 0..MAX_TYPES {
            for col in 0..MAX_TYPES {
                let x = (row as f32 + phase) * self.frequency;
                let y = col as f32 * self.frequency;
                cells[row * MAX_TYPES + col] =
                    (self.noise.sample(x, y) * self.amplitude).clamp(-1.0, 1.0);
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_range() {
        let noise = ValueNoise::new(3);
        for i in 0..500 {
            let v = noise.sample(i as f32 * 0.37 - 50.0, i as f32 * 0.11);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut modulator = NoiseModulator::new(DEFAULT_NOISE_SEED);
        modulator.set_params(1.3, 0.7, 0.9);
        let a = modulator.generate(12.5);
        let b = modulator.generate(12.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_changes_over_time() {
        let modulator = NoiseModulator::new(DEFAULT_NOISE_SEED);
        assert_ne!(modulator.generate(0.0), modulator.generate(3.7));
    }

    #[test]
    fn test_phase_keeps_clock_precision() {
        let mut modulator = NoiseModulator::new(DEFAULT_NOISE_SEED);
        modulator.set_params(0.75, 0.5, 1.0);
        // 2^24 + 1 is not an f32; scaling first keeps the extra second
        let late = modulator.generate(16_777_217.0);
        let earlier = modulator.generate(16_777_216.0);
        assert_ne!(late, earlier);
    }

    #[test]
    fn test_zero_time_scale_freezes_matrix() {
        let mut modulator = NoiseModulator::new(1);
        modulator.set_params(0.0, 0.5, 0.5);
        assert_eq!(modulator.generate(0.0), modulator.generate(100.0));
    }

    #[test]
    fn test_amplitude_bounds_cells() {
        let mut modulator = NoiseModulator::new(9);
        modulator.set_params(1.0, 1.3, 0.2);
        let cells = modulator.generate(4.2);
        assert!(cells.iter().all(|v| v.abs() <= 0.2 + 1e-6));
    }

    #[test]
    fn test_params_are_clamped() {
        let mut modulator = NoiseModulator::new(0);
        modulator.set_params(9.0, 0.0, 5.0);
        assert_eq!(modulator.params(), (2.0, 0.01, 1.0));
        modulator.set_params(f32::NAN, 1.0, 0.5);
        assert_eq!(modulator.params(), (2.0, 1.0, 0.5));
    }
}
