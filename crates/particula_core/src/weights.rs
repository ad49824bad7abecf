//! Signed interaction coefficients between particle types.
//!
//! Always stored as the full 8×8 grid, row-major: `cell[row * 8 + col]` is the
//! weight particle type `row` applies toward type `col`. Only the top-left
//! `nbTypes × nbTypes` block is read by the force kernel.
//!
//! All writes go through [`WeightMatrix::apply`] with a [`WeightEdit`], so
//! manual edits and the noise overwrite share one mutation point.

use crate::config::{validate_weight, validate_weights};
use crate::error::Result;
use particula_data::{MAX_TYPES, WEIGHT_CELLS};
use rand::Rng;

/// One mutation of the weight grid.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightEdit {
    Set { index: usize, value: f32 },
    SetAll(Vec<f32>),
    Randomize,
    Zero,
    Mirror,
    /// Whole-grid replacement produced by the noise modulator.
    Overwrite(Box<[f32; WEIGHT_CELLS]>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    cells: [f32; WEIGHT_CELLS],
}

impl Default for WeightMatrix {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl WeightMatrix {
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            cells: [0.0; WEIGHT_CELLS],
        }
    }

    /// Builds a matrix from a validated 64-cell slice.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        validate_weights(values)?;
        let mut cells = [0.0; WEIGHT_CELLS];
        cells.copy_from_slice(values);
        Ok(Self { cells })
    }

    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cells[row * MAX_TYPES + col]
    }

    #[must_use]
    pub fn cells(&self) -> &[f32; WEIGHT_CELLS] {
        &self.cells
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.cells.to_vec()
    }

    /// Applies one edit. A rejected edit leaves the matrix unchanged.
    pub fn apply<R: Rng + ?Sized>(&mut self, edit: WeightEdit, rng: &mut R) -> Result<()> {
        match edit {
            WeightEdit::Set { index, value } => {
                validate_weight(index, value)?;
                self.cells[index] = value;
            }
            WeightEdit::SetAll(values) => {
                validate_weights(&values)?;
                self.cells.copy_from_slice(&values);
            }
            WeightEdit::Randomize => self.randomize_all(rng),
            WeightEdit::Zero => self.zero_all(),
            WeightEdit::Mirror => self.mirror(),
            WeightEdit::Overwrite(cells) => {
                self.cells = *cells;
            }
        }
        Ok(())
    }

    fn randomize_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = rng.gen_range(-1.0..=1.0);
        }
    }

    fn zero_all(&mut self) {
        self.cells = [0.0; WEIGHT_CELLS];
    }

    /// Copies the upper triangle onto the lower one over the full grid.
    fn mirror(&mut self) {
        for i in 0..MAX_TYPES {
            for j in 0..i {
                self.cells[i * MAX_TYPES + j] = self.cells[j * MAX_TYPES + i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn random_matrix() -> WeightMatrix {
        let mut m = WeightMatrix::zeroed();
        m.apply(WeightEdit::Randomize, &mut rng()).unwrap();
        m
    }

    #[test]
    fn test_randomize_in_range() {
        let m = random_matrix();
        assert!(m.cells().iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(m.cells().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_zero() {
        let mut m = random_matrix();
        m.apply(WeightEdit::Zero, &mut rng()).unwrap();
        assert!(m.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mirror_full_grid() {
        let mut m = random_matrix();
        let before = m.clone();
        m.apply(WeightEdit::Mirror, &mut rng()).unwrap();
        for i in 0..MAX_TYPES {
            for j in 0..MAX_TYPES {
                if i > j {
                    assert_eq!(m.get(i, j), m.get(j, i));
                } else {
                    assert_eq!(m.get(i, j), before.get(i, j));
                }
            }
        }
    }

    #[test]
    fn test_set_single_cell() {
        let mut m = WeightMatrix::zeroed();
        m.apply(WeightEdit::Set { index: 9, value: -0.5 }, &mut rng())
            .unwrap();
        assert_eq!(m.get(1, 1), -0.5);
    }

    #[test]
    fn test_rejected_writes_keep_state() {
        let mut m = random_matrix();
        let before = m.clone();
        assert_eq!(
            m.apply(WeightEdit::Set { index: 64, value: 0.0 }, &mut rng()),
            Err(SimError::WeightIndexOutOfRange(64))
        );
        assert!(m
            .apply(WeightEdit::Set { index: 3, value: 1.5 }, &mut rng())
            .is_err());
        assert!(m
            .apply(WeightEdit::Set { index: 3, value: f32::NAN }, &mut rng())
            .is_err());
        assert!(m
            .apply(WeightEdit::SetAll(vec![0.0; 63]), &mut rng())
            .is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn test_overwrite() {
        let mut m = WeightMatrix::zeroed();
        m.apply(WeightEdit::Overwrite(Box::new([0.25; WEIGHT_CELLS])), &mut rng())
            .unwrap();
        assert_eq!(m.get(7, 7), 0.25);
    }
}
