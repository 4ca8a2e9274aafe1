//! Randomness, grid placement, and the distance matrix for the firefly
//! simulation.
//!
//! Everything in this crate is computed once during setup, before any
//! firefly task spawns:
//!
//! - [`rng`] -- [`RandomSource`], the locked xorshift generator shared by
//!   placement and actor start jitter.
//! - [`grid`] -- [`PositionField`], collision-free random placement of
//!   flies on the terminal grid.
//! - [`distance`] -- [`DistanceMatrix`], the symmetric rounded-Euclidean
//!   pairwise distances, immutable and lock-free to read thereafter.
//!
//! [`RandomSource`]: rng::RandomSource
//! [`PositionField`]: grid::PositionField
//! [`DistanceMatrix`]: distance::DistanceMatrix

pub mod distance;
pub mod grid;
pub mod rng;

mod error;

pub use distance::DistanceMatrix;
pub use error::FieldError;
pub use grid::PositionField;
pub use rng::RandomSource;
