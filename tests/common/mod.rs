use particula_core::config::SimConfig;
use particula_core::engine::{SimOptions, Simulation};
use particula_core::space;
use particula_data::{Particle, Vec2, MAX_TYPES};

#[allow(dead_code)]
pub struct SimBuilder {
    config: SimConfig,
    particles: Option<Vec<Particle>>,
    particle_count: usize,
    seed: u64,
}

#[allow(dead_code)]
impl SimBuilder {
    /// Default physics with all weights zero.
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            particles: None,
            particle_count: 256,
            seed: 7,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_nb_types(mut self, nb_types: usize) -> Self {
        self.config.attraction.nb_types = nb_types;
        self
    }

    pub fn with_weight(mut self, row: usize, col: usize, value: f32) -> Self {
        self.config.attraction.values[row * MAX_TYPES + col] = value;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.config.physics.time_scale = time_scale;
        self
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Places particles at fixed positions, at rest. Index order decides types.
    pub fn with_positions(mut self, positions: &[(f32, f32)]) -> Self {
        self.particle_count = positions.len();
        self.particles = Some(
            positions
                .iter()
                .map(|&(x, y)| Particle::at(Vec2::new(x, y)))
                .collect(),
        );
        self
    }

    pub fn build(self) -> Simulation {
        let options = SimOptions {
            particle_count: self.particle_count,
            seed: Some(self.seed),
            ..Default::default()
        };
        let mut sim =
            Simulation::new(self.config, options).expect("Failed to create simulation in test builder");
        if let Some(particles) = self.particles {
            sim.load_particles(particles)
                .expect("particle count matches builder");
            // a paused tick applies the load without stepping
            sim.pause();
            sim.tick(0.0);
            sim.resume();
        }
        sim
    }
}

#[allow(dead_code)]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    space::delta(a, b).length()
}

#[allow(dead_code)]
pub fn min_pair_distance(sim: &Simulation) -> f32 {
    let particles = sim.particles();
    let mut min = f32::MAX;
    for i in 0..particles.len() {
        for j in 0..i {
            min = min.min(distance(particles[i].position, particles[j].position));
        }
    }
    min
}

#[allow(dead_code)]
pub fn assert_in_bounds(sim: &Simulation) {
    for (i, p) in sim.particles().iter().enumerate() {
        assert!(
            space::in_bounds(p.position),
            "particle {} escaped the square at {:?} (tick {})",
            i,
            p.position,
            sim.tick_count()
        );
    }
}
