//! Shared type definitions for the firefly synchrony simulation.
//!
//! Every crate in the workspace speaks in these types:
//!
//! - [`FlyId`] -- dense integer identity of one firefly, doubling as its
//!   row/column index into the shared matrices.
//! - [`GridPosition`] -- a firefly's fixed place on the terminal grid.
//! - [`FireRecord`] -- one entity's final fire-time accounting row, with
//!   the canonical (time, row, column) ordering used by the exporter.
//! - [`SwarmSnapshot`] -- the per-tick read-only view handed to the
//!   rendering collaborator.
//! - [`RunEndReason`] -- why a swarm run ended.

mod ids;
mod records;
mod snapshot;

pub use ids::FlyId;
pub use records::{FireRecord, GridPosition};
pub use snapshot::{RunEndReason, SwarmSnapshot};
