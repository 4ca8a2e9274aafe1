//! The shared flash-observability grid for the distance model.
//!
//! Cell `(i, j)` records whether fly `i`'s delayed, attenuated signal is
//! currently observable to fly `j`. Row `i` is written only by actor `i`,
//! always as a whole row under the write half of one coarse lock, so a
//! reader can never observe a torn row with mixed old and new cells. Any
//! actor and the coordinator may read any cell.

use tokio::sync::RwLock;

use crate::SyncError;

/// NxN observability grid with whole-row publishes.
#[derive(Debug)]
pub struct VisibilityMatrix {
    size: usize,
    rows: RwLock<Vec<Vec<bool>>>,
}

impl VisibilityMatrix {
    /// Create an all-false grid for `size` flies.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            rows: RwLock::new(vec![vec![false; size]; size]),
        }
    }

    /// Publish fly `fly`'s full row atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FlyOutOfRange`] or [`SyncError::RowShape`] if
    /// the row does not belong in the grid.
    pub async fn set_row(&self, fly: usize, row: Vec<bool>) -> Result<(), SyncError> {
        if row.len() != self.size {
            return Err(SyncError::RowShape {
                fly,
                expected: self.size,
                actual: row.len(),
            });
        }
        let mut rows = self.rows.write().await;
        let slot = rows.get_mut(fly).ok_or(SyncError::FlyOutOfRange {
            fly,
            size: self.size,
        })?;
        *slot = row;
        Ok(())
    }

    /// Publish fly `fly`'s row and, in the same critical section, read
    /// back column `fly` -- which peers' signals currently reach this fly,
    /// by each peer's *own* published row.
    ///
    /// This is the per-tick step of the distance actor: it judges a
    /// peer's visibility by what the peer published, never by recomputing
    /// the peer's schedule locally.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FlyOutOfRange`] or [`SyncError::RowShape`] if
    /// the row does not belong in the grid.
    pub async fn publish_and_observe(
        &self,
        fly: usize,
        row: Vec<bool>,
    ) -> Result<Vec<bool>, SyncError> {
        if row.len() != self.size {
            return Err(SyncError::RowShape {
                fly,
                expected: self.size,
                actual: row.len(),
            });
        }
        let mut rows = self.rows.write().await;
        let slot = rows.get_mut(fly).ok_or(SyncError::FlyOutOfRange {
            fly,
            size: self.size,
        })?;
        *slot = row;

        let column = rows
            .iter()
            .map(|peer_row| peer_row.get(fly).copied().unwrap_or(false))
            .collect();
        Ok(column)
    }

    /// Read one cell; out-of-range reads are false.
    pub async fn read_cell(&self, i: usize, j: usize) -> bool {
        let rows = self.rows.read().await;
        rows.get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    }

    /// Read one full row as a consistent snapshot.
    pub async fn read_row(&self, fly: usize) -> Option<Vec<bool>> {
        let rows = self.rows.read().await;
        rows.get(fly).cloned()
    }

    /// Read one full column as a consistent snapshot.
    pub async fn read_column(&self, fly: usize) -> Vec<bool> {
        let rows = self.rows.read().await;
        rows.iter()
            .map(|row| row.get(fly).copied().unwrap_or(false))
            .collect()
    }

    /// The synchrony predicate: true iff every off-diagonal cell is true.
    ///
    /// Self-cells are excluded -- an entity trivially "seeing" itself is
    /// not meaningful.
    pub async fn all_visible(&self) -> bool {
        let rows = self.rows.read().await;
        rows.iter().enumerate().all(|(i, row)| {
            row.iter()
                .enumerate()
                .all(|(j, cell)| i == j || *cell)
        })
    }

    /// Copy the whole grid as a consistent snapshot.
    pub async fn snapshot(&self) -> Vec<Vec<bool>> {
        self.rows.read().await.clone()
    }

    /// Number of flies the grid covers.
    pub const fn size(&self) -> usize {
        self.size
    }
}
