//! The simulation context.
//!
//! [`Simulation`] owns every piece of state: configuration, weight grid,
//! noise modulator, pointer field and the double-buffered particles. It is
//! created by the caller and passed around explicitly; there is no global
//! instance.
//!
//! ## Tick phases
//!
//! 1. Drain commands sent through [`CommandSender`] handles.
//! 2. Apply queued weight edits, position resets and full-config loads, in
//!    submission order. This is the only place the weight grid and the
//!    particle buffers are mutated from outside the step.
//! 3. If paused, stop here.
//! 4. Ease the pointer activation and, when noise is on, overwrite the grid.
//! 5. Force pass on the front buffer, integration into the back buffer, swap.
//! 6. Advance the elapsed clock.
//!
//! Scalar setters (physics, type count, response mode, noise and pointer
//! settings) are validated and take effect immediately; they are read at the
//! next step.

use crate::commands::{CommandSender, SimCommand};
use crate::config::{validate_nb_types, PointerConfig, SimConfig};
use crate::curve::ForceCurve;
use crate::error::{Result, SimError};
use crate::integrator::{integrate, IntegratorContext};
use crate::kernel::{compute_forces, KernelContext};
use crate::metrics::Metrics;
use crate::noise::{NoiseModulator, DEFAULT_NOISE_SEED};
use crate::particles::{ParticleSet, StepBuffers};
use crate::pointer::PointerField;
use crate::snapshot::SimSnapshot;
use crate::weights::{WeightEdit, WeightMatrix};
use particula_data::{
    Particle, PhysicsParam, ResponseMode, Vec2, BASE_TICK, DEFAULT_PARTICLE_COUNT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

/// Construction options that are not part of the persisted configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub particle_count: usize,
    /// Seed of the generator behind position and weight randomisation.
    /// `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Simulation seconds per tick before `timeScale`.
    pub base_tick: f32,
    pub noise_seed: u64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            seed: None,
            base_tick: BASE_TICK,
            noise_seed: DEFAULT_NOISE_SEED,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(SimError::invalid_config("particle count must be positive"));
        }
        if !self.base_tick.is_finite() || self.base_tick <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "base tick must be positive, got {}",
                self.base_tick
            )));
        }
        Ok(())
    }
}

/// Work deferred to the start of the next tick.
#[derive(Debug)]
enum Pending {
    Weights(WeightEdit),
    ResetPositions,
    LoadParticles(Vec<Particle>),
    ApplyConfig(Box<SimConfig>),
}

impl Pending {
    fn name(&self) -> &'static str {
        match self {
            Pending::Weights(_) => "weight_edit",
            Pending::ResetPositions => "reset_positions",
            Pending::LoadParticles(_) => "load_particles",
            Pending::ApplyConfig(_) => "apply_config",
        }
    }
}

pub struct Simulation {
    config: SimConfig,
    weights: WeightMatrix,
    noise: NoiseModulator,
    pointer: PointerField,
    particles: ParticleSet,
    rng: ChaCha8Rng,
    pending: Vec<Pending>,
    command_tx: Sender<SimCommand>,
    command_rx: Receiver<SimCommand>,
    base_tick: f32,
    elapsed: f64,
    tick_count: u64,
    paused: bool,
    metrics: Metrics,
}

impl Simulation {
    /// Builds a simulation from a validated configuration.
    pub fn new(config: SimConfig, options: SimOptions) -> Result<Self> {
        config.validate()?;
        options.validate()?;
        let config = config.normalized();

        let mut rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let weights = WeightMatrix::from_slice(&config.attraction.values)?;
        let noise = NoiseModulator::from_config(&config.attraction, options.noise_seed);
        let pointer = PointerField::new(config.pointer);
        let particles = ParticleSet::new(options.particle_count, &mut rng);
        let (command_tx, command_rx) = mpsc::channel();

        tracing::info!(
            particles = options.particle_count,
            nb_types = config.attraction.nb_types,
            seed = ?options.seed,
            fingerprint = %config.fingerprint(),
            "Simulation created"
        );

        Ok(Self {
            config,
            weights,
            noise,
            pointer,
            particles,
            rng,
            pending: Vec::new(),
            command_tx,
            command_rx,
            base_tick: options.base_tick,
            elapsed: 0.0,
            tick_count: 0,
            paused: false,
            metrics: Metrics::new(),
        })
    }

    // --- tick loop ---

    /// Advances the simulation by one step.
    ///
    /// `dt_real` only feeds the elapsed clock that drives the noise phase; the
    /// integration step is always `base_tick * timeScale`. Negative or
    /// non-finite `dt_real` leaves the clock where it is.
    pub fn tick(&mut self, dt_real: f32) {
        let start = Instant::now();

        self.drain_commands();
        self.apply_pending();

        if self.paused {
            return;
        }

        self.pointer.advance();
        if self.noise.is_enabled() {
            let cells = self.noise.generate(self.elapsed);
            if let Err(e) = self.weights.apply(WeightEdit::Overwrite(cells), &mut self.rng) {
                tracing::error!(error = %e, "Noise overwrite failed");
            }
        }

        self.step();

        if dt_real.is_finite() && dt_real >= 0.0 {
            self.elapsed += f64::from(dt_real);
        }
        self.tick_count += 1;
        self.metrics.record_tick(start.elapsed(), self.particles.len());
    }

    fn step(&mut self) {
        let physics = self.config.physics;
        let kernel = KernelContext::new(
            &physics,
            &self.weights,
            self.config.attraction.nb_types,
            self.config.attraction.response,
        );
        let integrator = IntegratorContext {
            dt: self.base_tick * physics.time_scale,
            friction: physics.friction,
            max_velocity: physics.max_velocity,
            pointer: &self.pointer,
        };

        let StepBuffers {
            current,
            forces,
            next,
        } = self.particles.step_buffers();
        compute_forces(&kernel, current, forces);
        integrate(&integrator, current, forces, next);
        self.particles.swap();
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            let name = command.name();
            if let Err(e) = self.execute(command) {
                self.metrics.record_rejected(name, &e.to_string());
            }
        }
    }

    fn apply_pending(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            let name = pending.name();
            let result = match pending {
                Pending::Weights(edit) => self.weights.apply(edit, &mut self.rng),
                Pending::ResetPositions => {
                    self.particles.randomize(&mut self.rng);
                    Ok(())
                }
                Pending::LoadParticles(particles) => self.particles.load(particles),
                Pending::ApplyConfig(config) => self.install_config(*config),
            };
            match result {
                Ok(()) => self.metrics.record_command(name),
                Err(e) => self.metrics.record_rejected(name, &e.to_string()),
            }
        }
    }

    fn install_config(&mut self, config: SimConfig) -> Result<()> {
        let weights = WeightMatrix::from_slice(&config.attraction.values)?;
        self.pointer.set_params(config.pointer)?;
        self.noise.set_enabled(config.attraction.use_noise);
        self.noise.set_params(
            config.attraction.noise_time_scale,
            config.attraction.noise_frequency,
            config.attraction.noise_amplitude,
        );
        self.weights = weights;
        self.config = config.normalized();
        tracing::info!(fingerprint = %self.config.fingerprint(), "Configuration applied");
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // --- commands ---

    /// Applies one command through the matching setter.
    pub fn execute(&mut self, command: SimCommand) -> Result<()> {
        match command {
            SimCommand::SetWeights(values) => self.set_weights(values),
            SimCommand::SetWeight { index, value } => self.set_single_weight(index, value),
            SimCommand::RandomizeWeights => self.randomize_weights(),
            SimCommand::ZeroWeights => self.zero_weights(),
            SimCommand::MirrorWeights => self.mirror_weights(),
            SimCommand::ResetPositions => {
                self.reset();
                Ok(())
            }
            SimCommand::SetPhysicsParam { param, value } => self.set_physics_param(param, value),
            SimCommand::SetNbTypes(n) => self.set_nb_types(n),
            SimCommand::SetResponseMode(mode) => {
                self.set_response_mode(mode);
                Ok(())
            }
            SimCommand::SetNoiseEnabled(enabled) => {
                self.set_noise_enabled(enabled);
                Ok(())
            }
            SimCommand::SetNoiseParams {
                time_scale,
                frequency,
                amplitude,
            } => {
                self.set_noise_params(time_scale, frequency, amplitude);
                Ok(())
            }
            SimCommand::SetPointerParams(params) => {
                self.set_pointer_params(params.attraction, params.strength, params.range)
            }
            SimCommand::SetPointerPressed(pressed) => {
                self.set_pointer_pressed(pressed);
                Ok(())
            }
            SimCommand::SetPointerPosition { x, y } => self.set_pointer_position(x, y),
            SimCommand::ApplyConfig(config) => self.apply_full_config(*config),
        }
    }

    /// Handle for submitting commands from other threads.
    #[must_use]
    pub fn command_sender(&self) -> CommandSender {
        CommandSender::new(self.command_tx.clone())
    }

    /// Queues a re-scatter of all positions with zeroed velocities.
    pub fn reset(&mut self) {
        self.pending.push(Pending::ResetPositions);
    }

    fn queue_weight_edit(&mut self, edit: WeightEdit) -> Result<()> {
        if self.noise.is_enabled() {
            return Err(SimError::NoiseActive);
        }
        self.pending.push(Pending::Weights(edit));
        Ok(())
    }

    pub fn set_weights(&mut self, values: Vec<f32>) -> Result<()> {
        SimCommand::SetWeights(values.clone()).validate()?;
        self.queue_weight_edit(WeightEdit::SetAll(values))
    }

    pub fn set_single_weight(&mut self, index: usize, value: f32) -> Result<()> {
        SimCommand::SetWeight { index, value }.validate()?;
        self.queue_weight_edit(WeightEdit::Set { index, value })
    }

    pub fn randomize_weights(&mut self) -> Result<()> {
        self.queue_weight_edit(WeightEdit::Randomize)
    }

    pub fn zero_weights(&mut self) -> Result<()> {
        self.queue_weight_edit(WeightEdit::Zero)
    }

    pub fn mirror_weights(&mut self) -> Result<()> {
        self.queue_weight_edit(WeightEdit::Mirror)
    }

    pub fn set_physics_param(&mut self, param: PhysicsParam, value: f32) -> Result<()> {
        self.config.physics.set(param, value)
    }

    /// [`Simulation::set_physics_param`] addressed by the persisted name.
    pub fn set_physics_param_by_name(&mut self, name: &str, value: f32) -> Result<()> {
        self.execute(SimCommand::physics_param(name, value)?)
    }

    /// Draws new values for every physics scalar except `timeScale`.
    pub fn randomize_physics(&mut self) {
        self.config.physics.randomize(&mut self.rng);
    }

    pub fn set_nb_types(&mut self, nb_types: usize) -> Result<()> {
        validate_nb_types(nb_types)?;
        self.config.attraction.nb_types = nb_types;
        Ok(())
    }

    pub fn set_response_mode(&mut self, mode: ResponseMode) {
        self.config.attraction.response = mode;
    }

    /// [`Simulation::set_response_mode`] from the persisted integer.
    pub fn set_response_index(&mut self, index: u8) -> Result<()> {
        self.execute(SimCommand::response_mode(index)?)
    }

    pub fn set_noise_enabled(&mut self, enabled: bool) {
        self.noise.set_enabled(enabled);
        self.config.attraction.use_noise = enabled;
    }

    /// Out-of-range values are clamped, never rejected.
    pub fn set_noise_params(&mut self, time_scale: f32, frequency: f32, amplitude: f32) {
        self.noise.set_params(time_scale, frequency, amplitude);
        let (time_scale, frequency, amplitude) = self.noise.params();
        self.config.attraction.noise_time_scale = time_scale;
        self.config.attraction.noise_frequency = frequency;
        self.config.attraction.noise_amplitude = amplitude;
    }

    pub fn set_pointer_params(
        &mut self,
        attraction: f32,
        strength: f32,
        range: f32,
    ) -> Result<()> {
        let params = PointerConfig {
            attraction,
            strength,
            range,
        };
        self.pointer.set_params(params)?;
        self.config.pointer = params;
        Ok(())
    }

    pub fn set_pointer_pressed(&mut self, pressed: bool) {
        self.pointer.set_pressed(pressed);
    }

    pub fn set_pointer_position(&mut self, x: f32, y: f32) -> Result<()> {
        self.pointer.set_position(x, y)
    }

    /// Validates and queues a whole configuration for the next tick boundary.
    /// Pointer position and press state, the elapsed clock and the particles
    /// are kept.
    pub fn apply_full_config(&mut self, config: SimConfig) -> Result<()> {
        config.validate()?;
        self.pending.push(Pending::ApplyConfig(Box::new(config)));
        Ok(())
    }

    /// Queues a restore of previously exported particles.
    pub fn load_particles(&mut self, particles: Vec<Particle>) -> Result<()> {
        if particles.len() != self.particles.len() {
            return Err(SimError::ParticleCountMismatch {
                expected: self.particles.len(),
                actual: particles.len(),
            });
        }
        self.pending.push(Pending::LoadParticles(particles));
        Ok(())
    }

    // --- read access ---

    /// Effective configuration, with the weight grid and noise settings as
    /// currently active.
    #[must_use]
    pub fn config(&self) -> SimConfig {
        let mut config = self.config.clone();
        config.attraction.values = self.weights.to_vec();
        config
    }

    #[must_use]
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    #[must_use]
    pub fn pointer(&self) -> &PointerField {
        &self.pointer
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Force accumulators of the last step.
    #[must_use]
    pub fn forces(&self) -> &[Vec2] {
        self.particles.forces()
    }

    #[must_use]
    pub fn snapshot(&self) -> SimSnapshot {
        let particles = self.particles.particles();
        SimSnapshot {
            tick: self.tick_count,
            elapsed: self.elapsed,
            nb_types: self.config.attraction.nb_types,
            response: self.config.attraction.response,
            positions: particles.iter().map(|p| p.position).collect(),
            velocities: particles.iter().map(|p| p.velocity).collect(),
            weights: self.weights.to_vec(),
        }
    }

    /// Attraction curve for a unit weight, as `(distance, force)` pairs.
    #[must_use]
    pub fn curve_samples(&self, n: usize) -> Vec<(f32, f32)> {
        ForceCurve::new(&self.config.physics).samples(n)
    }

    /// Simulation seconds fed through [`Simulation::tick`].
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of integrated steps, paused ticks excluded.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Integration step `base_tick * timeScale`.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.base_tick * self.config.physics.time_scale
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use particula_data::{MAX_TYPES, WEIGHT_CELLS};

    fn sim(count: usize) -> Simulation {
        let options = SimOptions {
            particle_count: count,
            seed: Some(11),
            ..Default::default()
        };
        Simulation::new(SimConfig::default(), options).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        let mut config = SimConfig::default();
        config.attraction.nb_types = 1;
        assert!(Simulation::new(config, SimOptions::default()).is_err());

        let options = SimOptions {
            particle_count: 0,
            ..Default::default()
        };
        assert!(Simulation::new(SimConfig::default(), options).is_err());
    }

    #[test]
    fn test_weight_edits_wait_for_tick() {
        let mut sim = sim(16);
        sim.set_single_weight(1, 0.75).unwrap();
        assert_eq!(sim.weights().get(0, 1), 0.0);
        sim.tick(0.016);
        assert_eq!(sim.weights().get(0, 1), 0.75);
    }

    #[test]
    fn test_edits_apply_in_order() {
        let mut sim = sim(8);
        sim.set_single_weight(MAX_TYPES, 0.5).unwrap();
        sim.mirror_weights().unwrap();
        sim.tick(0.0);
        // mirror copied cell (0,1) = 0 over (1,0)
        assert_eq!(sim.weights().get(1, 0), 0.0);
    }

    #[test]
    fn test_rejected_writes_keep_state() {
        let mut sim = sim(8);
        assert!(sim.set_nb_types(9).is_err());
        assert_eq!(sim.config().attraction.nb_types, 4);
        assert!(sim.set_weights(vec![0.0; 63]).is_err());
        assert!(sim.set_single_weight(64, 0.0).is_err());
        assert!(sim.set_physics_param(PhysicsParam::Friction, -0.1).is_err());
        assert!(sim.set_physics_param_by_name("drag", 0.1).is_err());
        assert!(sim.set_response_index(7).is_err());
        assert_eq!(sim.config(), SimConfig::default());
    }

    #[test]
    fn test_noise_owns_matrix() {
        let mut sim = sim(8);
        sim.set_noise_enabled(true);
        assert_eq!(sim.zero_weights(), Err(SimError::NoiseActive));
        sim.tick(0.5);
        let expected = sim.noise.generate(0.0);
        assert_eq!(sim.weights().cells(), &*expected);
    }

    #[test]
    fn test_pause_freezes_state_and_clock() {
        let mut sim = sim(32);
        sim.tick(0.1);
        sim.pause();
        let before = sim.snapshot();
        sim.set_single_weight(0, -1.0).unwrap();
        sim.tick(0.1);
        let after = sim.snapshot();
        assert_eq!(before.positions, after.positions);
        assert_eq!(before.tick, after.tick);
        assert_eq!(sim.elapsed(), before.elapsed);
        // pending edits still land at the paused tick boundary
        assert_eq!(sim.weights().get(0, 0), -1.0);
        sim.resume();
        sim.tick(0.1);
        assert_eq!(sim.tick_count(), 2);
    }

    #[test]
    fn test_reset_positions() {
        let mut sim = sim(64);
        sim.set_pointer_pressed(true);
        for _ in 0..10 {
            sim.tick(0.016);
        }
        let before = sim.snapshot();
        sim.reset();
        sim.pause();
        sim.tick(0.016);
        assert_ne!(sim.snapshot().positions, before.positions);
        assert!(sim.particles().iter().all(|p| p.velocity == Vec2::ZERO));
        assert!(sim.forces().iter().all(|f| *f == Vec2::ZERO));
    }

    #[test]
    fn test_command_sender_round_trip() {
        let mut sim = sim(8);
        let sender = sim.command_sender();
        let handle = std::thread::spawn(move || {
            sender.send(SimCommand::SetNbTypes(3)).unwrap();
            sender
                .send(SimCommand::SetWeights(vec![0.5; WEIGHT_CELLS]))
                .unwrap();
        });
        handle.join().unwrap();
        sim.tick(0.0);
        assert_eq!(sim.config().attraction.nb_types, 3);
        assert_eq!(sim.weights().get(7, 7), 0.5);
    }

    #[test]
    fn test_apply_full_config() {
        let mut sim = sim(8);
        let mut config = SimConfig::default();
        config.attraction.nb_types = 6;
        config.attraction.values = vec![-0.25; WEIGHT_CELLS];
        config.physics.friction = 0.4;
        sim.apply_full_config(config.clone()).unwrap();
        sim.tick(0.0);
        assert_eq!(sim.config(), config);
    }

    #[test]
    fn test_load_particles_length_checked() {
        let mut sim = sim(4);
        assert!(sim.load_particles(vec![Particle::default(); 3]).is_err());
        let particles = vec![Particle::at(Vec2::new(1.0, 1.0)); 4];
        sim.load_particles(particles).unwrap();
        sim.pause();
        sim.tick(0.0);
        assert!(sim.particles().iter().all(|p| p.position == Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_curve_samples() {
        let sim = sim(2);
        let samples = sim.curve_samples(61);
        assert_eq!(samples.len(), 61);
        assert!((samples[0].1 + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dt_follows_time_scale() {
        let mut sim = sim(2);
        sim.set_physics_param(PhysicsParam::TimeScale, 2.0).unwrap();
        assert!((sim.dt() - 0.04).abs() < 1e-7);
    }

    #[test]
    fn test_randomize_physics_keeps_time_scale() {
        let mut sim = sim(8);
        sim.set_physics_param(PhysicsParam::TimeScale, 3.5).unwrap();
        let before = sim.config().physics;

        sim.randomize_physics();
        let after = sim.config().physics;
        assert_eq!(after.time_scale, 3.5);
        assert_ne!(after, before);
        for param in PhysicsParam::ALL {
            assert!(
                param.contains(after.get(param)),
                "{} = {} out of range",
                param.name(),
                after.get(param)
            );
        }
        assert!(after.validate().is_ok());
    }
}
