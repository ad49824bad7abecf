use particula_data::{Particle, ResponseMode, Vec2};
use serde::{Deserialize, Serialize};

/// Owned copy of the state a renderer or exporter needs after a tick.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimSnapshot {
    pub tick: u64,
    pub elapsed: f64,
    pub nb_types: usize,
    pub response: ResponseMode,
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    /// Active 8×8 weight grid, row-major.
    pub weights: Vec<f32>,
}

impl SimSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Type label of particle `index`, for colouring.
    #[must_use]
    pub fn type_of(&self, index: usize) -> usize {
        Particle::type_of(index, self.nb_types)
    }

    /// Rebuilds particle records, e.g. to restore this state later.
    #[must_use]
    pub fn particles(&self) -> Vec<Particle> {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(&position, &velocity)| Particle { position, velocity })
            .collect()
    }

    /// Largest particle speed in the snapshot.
    #[must_use]
    pub fn max_speed(&self) -> f32 {
        self.velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SimSnapshot {
        SimSnapshot {
            tick: 3,
            elapsed: 0.05,
            nb_types: 3,
            response: ResponseMode::Cubic,
            positions: vec![Vec2::new(1.0, 2.0), Vec2::new(-3.0, 4.0)],
            velocities: vec![Vec2::new(0.1, 0.0), Vec2::new(0.0, -0.4)],
            weights: vec![0.0; 64],
        }
    }

    #[test]
    fn test_particles_rebuilt() {
        let particles = snapshot().particles();
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[1].position, Vec2::new(-3.0, 4.0));
        assert_eq!(particles[1].velocity, Vec2::new(0.0, -0.4));
    }

    #[test]
    fn test_max_speed_and_types() {
        let s = snapshot();
        assert!((s.max_speed() - 0.4).abs() < 1e-6);
        assert_eq!(s.type_of(4), 1);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        assert!(json.contains("\"nbTypes\":3"));
        assert!(json.contains("\"response\":2"));
    }
}
