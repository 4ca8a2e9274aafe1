//! Pairwise distances between placed flies.
//!
//! The matrix is computed once at setup from the position field and is
//! immutable thereafter: every actor reads it lock-free. Distances are
//! Euclidean, truncated to whole ticks -- one tick of signal delay per
//! unit of distance in the delayed-visibility model.

use firefly_types::GridPosition;

use crate::{FieldError, PositionField};

/// Symmetric matrix of truncated Euclidean distances, zero on the
/// diagonal, stored row-major.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<i64>,
}

impl DistanceMatrix {
    /// Build the matrix from a placed field.
    pub fn from_positions(field: &PositionField) -> Self {
        let positions = field.positions();
        let size = positions.len();
        let mut cells = vec![0_i64; size.saturating_mul(size)];

        for (i, a) in positions.iter().enumerate() {
            for (j, b) in positions.iter().enumerate().skip(i.saturating_add(1)) {
                let distance = euclidean(*a, *b);
                if let Some(cell) = cells.get_mut(index_of(size, i, j)) {
                    *cell = distance;
                }
                if let Some(cell) = cells.get_mut(index_of(size, j, i)) {
                    *cell = distance;
                }
            }
        }

        Self { size, cells }
    }

    /// Build a matrix from explicit rows (useful for testing and scripted
    /// scenarios).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::MatrixShape`] if the rows do not form a
    /// square matrix, the diagonal is not zero, or any cell differs from
    /// its transpose.
    pub fn from_parts(rows: Vec<Vec<i64>>) -> Result<Self, FieldError> {
        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(FieldError::MatrixShape {
                    reason: format!("row {i} has {} cells, expected {size}", row.len()),
                });
            }
            if row.get(i).copied().unwrap_or(0) != 0 {
                return Err(FieldError::MatrixShape {
                    reason: format!("diagonal cell ({i}, {i}) is not zero"),
                });
            }
            for (j, cell) in row.iter().enumerate() {
                let transposed = rows
                    .get(j)
                    .and_then(|other| other.get(i))
                    .copied()
                    .unwrap_or(0);
                if *cell != transposed {
                    return Err(FieldError::MatrixShape {
                        reason: format!("cell ({i}, {j}) is not symmetric"),
                    });
                }
            }
        }

        let cells = rows.into_iter().flatten().collect();
        Ok(Self { size, cells })
    }

    /// Distance between flies `i` and `j`, or `None` when out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<i64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.cells.get(index_of(self.size, i, j)).copied()
    }

    /// Distance between flies `i` and `j`; out-of-range pairs read as zero.
    pub fn distance(&self, i: usize, j: usize) -> i64 {
        self.get(i, j).unwrap_or(0)
    }

    /// Number of flies the matrix covers.
    pub const fn size(&self) -> usize {
        self.size
    }
}

/// Row-major cell index.
const fn index_of(size: usize, i: usize, j: usize) -> usize {
    i.saturating_mul(size).saturating_add(j)
}

/// Truncated Euclidean distance between two grid positions.
fn euclidean(a: GridPosition, b: GridPosition) -> i64 {
    let dx = f64::from(a.col) - f64::from(b.col);
    let dy = f64::from(a.row) - f64::from(b.row);
    let distance = dx.mul_add(dx, dy * dy).sqrt();
    // Grid coordinates are bounded well inside f64's exact integer range;
    // truncation toward zero is the intended whole-tick delay.
    #[allow(clippy::cast_possible_truncation)]
    {
        distance as i64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rng::DEFAULT_SEED;
    use crate::RandomSource;

    fn placed_matrix(count: usize) -> DistanceMatrix {
        let rng = RandomSource::new(DEFAULT_SEED).unwrap();
        let field = PositionField::place(&rng, count, 24, 79).unwrap();
        DistanceMatrix::from_positions(&field)
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let matrix = placed_matrix(32);
        for i in 0..matrix.size() {
            assert_eq!(matrix.distance(i, i), 0);
            for j in 0..matrix.size() {
                assert_eq!(matrix.distance(i, j), matrix.distance(j, i));
            }
        }
    }

    #[test]
    fn known_distances_truncate() {
        let field = PositionField::from_parts(
            vec![
                GridPosition::new(1, 1),
                GridPosition::new(1, 2),
                GridPosition::new(4, 5),
                GridPosition::new(2, 2),
            ],
            24,
            79,
        );
        let matrix = DistanceMatrix::from_positions(&field);

        // Adjacent cells: distance 1.
        assert_eq!(matrix.distance(0, 1), 1);
        // 3-4-5 triangle: exactly 5.
        assert_eq!(matrix.distance(0, 2), 5);
        // Diagonal neighbor: sqrt(2) truncates to 1.
        assert_eq!(matrix.distance(0, 3), 1);
    }

    #[test]
    fn out_of_range_reads_are_none() {
        let matrix = placed_matrix(4);
        assert_eq!(matrix.get(0, 4), None);
        assert_eq!(matrix.get(4, 0), None);
        assert_eq!(matrix.distance(9, 9), 0);
    }

    #[test]
    fn from_parts_accepts_a_valid_matrix() {
        let matrix = DistanceMatrix::from_parts(vec![
            vec![0, 2, 7],
            vec![2, 0, 3],
            vec![7, 3, 0],
        ])
        .unwrap();
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.distance(0, 2), 7);
    }

    #[test]
    fn from_parts_rejects_asymmetry() {
        let result = DistanceMatrix::from_parts(vec![vec![0, 2], vec![3, 0]]);
        assert!(matches!(result, Err(FieldError::MatrixShape { .. })));
    }

    #[test]
    fn from_parts_rejects_nonzero_diagonal() {
        let result = DistanceMatrix::from_parts(vec![vec![1, 2], vec![2, 0]]);
        assert!(matches!(result, Err(FieldError::MatrixShape { .. })));
    }

    #[test]
    fn from_parts_rejects_ragged_rows() {
        let result = DistanceMatrix::from_parts(vec![vec![0, 2], vec![2]]);
        assert!(matches!(result, Err(FieldError::MatrixShape { .. })));
    }
}
