//! Error types for the `firefly-field` crate.
//!
//! All fallible operations in this crate return [`FieldError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur during field setup.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// A random range request had `max < min`.
    #[error("invalid random range: max {max} < min {min}")]
    InvalidRange {
        /// Requested lower bound (inclusive).
        min: i64,
        /// Requested upper bound (inclusive).
        max: i64,
    },

    /// The xorshift register cannot be seeded with zero.
    #[error("random seed must be non-zero")]
    ZeroSeed,

    /// The grid bounds leave no cells to place flies on.
    #[error("grid bounds are degenerate: {rows} rows x {cols} cols")]
    DegenerateGrid {
        /// Configured row bound.
        rows: u32,
        /// Configured column bound.
        cols: u32,
    },

    /// More flies were requested than the grid has cells.
    #[error("cannot place {flies} flies on a grid of {cells} cells")]
    GridCapacity {
        /// Number of flies requested.
        flies: usize,
        /// Number of cells available.
        cells: u64,
    },

    /// A distance matrix was built from rows of inconsistent shape.
    #[error("invalid distance matrix: {reason}")]
    MatrixShape {
        /// Explanation of the shape violation.
        reason: String,
    },

    /// Arithmetic overflow during a checked field calculation.
    #[error("arithmetic overflow in field calculation")]
    ArithmeticOverflow,
}
