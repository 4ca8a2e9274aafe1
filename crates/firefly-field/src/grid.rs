//! Collision-free random placement of flies on the terminal grid.

use firefly_types::{FlyId, GridPosition};
use tracing::{debug, trace};

use crate::{FieldError, RandomSource};

/// The placed positions of every fly, immutable after construction.
///
/// Positions are 1-based (terminal cursor addressing) and pairwise
/// distinct. Placement uses a retry-in-place policy: when a freshly
/// rolled position collides with an earlier fly, the *current* fly's
/// position is re-rolled -- not a fresh fly started. This degrades as the
/// fly count approaches the grid capacity; the capacity check below
/// bounds it but deliberately does not change the policy.
#[derive(Debug, Clone)]
pub struct PositionField {
    positions: Vec<GridPosition>,
    rows: u32,
    cols: u32,
}

impl PositionField {
    /// Place `count` flies at random distinct positions on a
    /// `rows` x `cols` grid.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DegenerateGrid`] if either bound is zero,
    /// [`FieldError::GridCapacity`] if `count` exceeds the cell count,
    /// or any error from the random source.
    pub fn place(
        rng: &RandomSource,
        count: usize,
        rows: u32,
        cols: u32,
    ) -> Result<Self, FieldError> {
        if rows == 0 || cols == 0 {
            return Err(FieldError::DegenerateGrid { rows, cols });
        }
        let cells = u64::from(rows)
            .checked_mul(u64::from(cols))
            .ok_or(FieldError::ArithmeticOverflow)?;
        let count_u64 =
            u64::try_from(count).map_err(|_err| FieldError::ArithmeticOverflow)?;
        if count_u64 > cells {
            return Err(FieldError::GridCapacity {
                flies: count,
                cells,
            });
        }

        let mut positions: Vec<GridPosition> = Vec::with_capacity(count);
        while positions.len() < count {
            let row = rng.next_in_range(1, i64::from(rows))?;
            let col = rng.next_in_range(1, i64::from(cols))?;
            // In range by construction of the draw above.
            let row = u32::try_from(row).map_err(|_err| FieldError::ArithmeticOverflow)?;
            let col = u32::try_from(col).map_err(|_err| FieldError::ArithmeticOverflow)?;
            let candidate = GridPosition::new(row, col);

            if positions.contains(&candidate) {
                // Occupied: re-roll this fly, not a fresh one.
                trace!(fly = positions.len(), %candidate, "position occupied, re-rolling");
                continue;
            }
            positions.push(candidate);
        }

        debug!(flies = count, rows, cols, "positions placed");
        Ok(Self {
            positions,
            rows,
            cols,
        })
    }

    /// Build a field from explicit positions (useful for testing and
    /// scripted scenarios). No distinctness check is applied.
    pub const fn from_parts(positions: Vec<GridPosition>, rows: u32, cols: u32) -> Self {
        Self {
            positions,
            rows,
            cols,
        }
    }

    /// Return all positions, indexed by fly id.
    pub fn positions(&self) -> &[GridPosition] {
        &self.positions
    }

    /// Return the position of one fly, if it exists.
    pub fn get(&self, fly: FlyId) -> Option<GridPosition> {
        self.positions.get(fly.into_inner()).copied()
    }

    /// Number of placed flies.
    pub const fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the field holds no flies.
    pub const fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Configured row bound.
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Configured column bound.
    pub const fn cols(&self) -> u32 {
        self.cols
    }
}
