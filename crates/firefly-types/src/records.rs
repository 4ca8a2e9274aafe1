//! Grid placement and fire-time accounting records.

use serde::{Deserialize, Serialize};

use crate::FlyId;

/// A firefly's position on the terminal grid, immutable after placement.
///
/// Rows and columns are 1-based, matching terminal cursor addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Row coordinate (1-based).
    pub row: u32,
    /// Column coordinate (1-based).
    pub col: u32,
}

impl GridPosition {
    /// Create a position from row/column coordinates.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl core::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One entity's final accounting row, produced once per fly at stop.
///
/// `fire_time` is the master-clock value recorded at the fly's last
/// light-on transition. The export collaborator writes these out in the
/// order given by [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireRecord {
    /// Master-clock time of the last light-on transition.
    pub fire_time: u64,
    /// Which fly this record belongs to.
    pub fly: FlyId,
    /// Row position of the fly.
    pub row: u32,
    /// Column position of the fly.
    pub col: u32,
}

impl FireRecord {
    /// Create a record from its parts.
    pub const fn new(fire_time: u64, fly: FlyId, row: u32, col: u32) -> Self {
        Self {
            fire_time,
            fly,
            row,
            col,
        }
    }
}

impl Ord for FireRecord {
    /// Fire time ascending, ties broken by row then column.
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.fire_time
            .cmp(&other.fire_time)
            .then(self.row.cmp(&other.row))
            .then(self.col.cmp(&other.col))
            .then(self.fly.cmp(&other.fly))
    }
}

impl PartialOrd for FireRecord {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
