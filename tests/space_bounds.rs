mod common;

use common::{assert_in_bounds, SimBuilder};
use particula_core::config::SimConfig;
use particula_data::{ResponseMode, HALF_RANGE};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn random_config(seed: u64, response: ResponseMode) -> SimConfig {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut config = SimConfig::default_with_rng(&mut rng);
    config.physics.randomize(&mut rng);
    config.physics.time_scale = 5.0;
    config.attraction.nb_types = 6;
    config.attraction.response = response;
    config
}

#[test]
fn test_positions_stay_in_square_for_every_response_mode() {
    for (seed, mode) in ResponseMode::ALL.into_iter().enumerate() {
        let config = random_config(seed as u64, mode);
        let mut sim = SimBuilder::new()
            .with_config(|c| *c = config)
            .with_particle_count(300)
            .with_seed(seed as u64)
            .build();
        for _ in 0..150 {
            sim.tick(1.0 / 60.0);
            assert_in_bounds(&sim);
        }
    }
}

#[test]
fn test_particles_at_the_edge_wrap_around() {
    let mut sim = SimBuilder::new()
        .with_nb_types(2)
        .with_weight(0, 1, 1.0)
        .with_weight(1, 0, 1.0)
        .with_time_scale(5.0)
        .with_positions(&[(HALF_RANGE - 0.5, 0.0), (-HALF_RANGE + 0.5, 0.0)])
        .build();
    for _ in 0..300 {
        sim.tick(1.0 / 60.0);
        assert_in_bounds(&sim);
    }
    // the pair attracts across the edge and settles around the seam
    let d = common::min_pair_distance(&sim);
    assert!(d < 1.5, "pair did not meet across the edge: {d}");
}

#[test]
fn test_force_and_velocity_bounds() {
    let config = random_config(42, ResponseMode::Quadratic);
    let max_force = config.physics.max_force;
    let max_velocity = config.physics.max_velocity;
    let mut sim = SimBuilder::new()
        .with_config(|c| *c = config)
        .with_particle_count(400)
        .build();

    for _ in 0..200 {
        sim.tick(1.0 / 60.0);
        for f in sim.forces() {
            assert!(f.length() <= max_force + 1e-5, "force {:?}", f);
        }
        for p in sim.particles() {
            assert!(p.velocity.length() <= max_velocity + 1e-5);
        }
    }
}

#[test]
fn test_pointer_overshoot_decays_after_release() {
    let mut sim = SimBuilder::new()
        .with_config(|c| {
            c.pointer.attraction = 1.0;
            c.pointer.strength = 10.0;
            c.pointer.range = 16.0;
        })
        .with_particle_count(200)
        .build();
    let max_velocity = sim.config().physics.max_velocity;

    sim.set_pointer_position(0.0, 0.0).unwrap();
    sim.set_pointer_pressed(true);
    let mut overshoot = false;
    for _ in 0..40 {
        sim.tick(1.0 / 60.0);
        overshoot |= sim.snapshot().max_speed() > max_velocity;
    }
    assert!(overshoot, "pointer never pushed a particle past maxVelocity");

    sim.set_pointer_pressed(false);
    let mut released_for = None;
    for tick in 0..100 {
        sim.tick(1.0 / 60.0);
        if !sim.pointer().is_active() {
            released_for.get_or_insert(tick);
            // no pointer push left: the velocity clamp holds for everyone
            assert!(
                sim.snapshot().max_speed() <= max_velocity + 1e-5,
                "speed above maxVelocity {tick} ticks after release"
            );
        }
    }

    // activation eases by 10% a tick and snaps to 0 below 1e-3
    let released_for = released_for.expect("pointer still active after 100 ticks");
    assert!((60..=70).contains(&released_for), "activation hit 0 at {released_for}");
    assert_eq!(sim.pointer().activation(), 0.0);
}
