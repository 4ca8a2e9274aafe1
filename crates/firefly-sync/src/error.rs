//! Error types for the `firefly-sync` crate.
//!
//! All fallible operations in this crate return [`SyncError`] through the
//! standard [`Result`] type alias. Degenerate observation cycles (no peer
//! seen) are deliberately *not* errors -- recentering is skipped and the
//! actor continues with an unchanged schedule.

use firefly_field::FieldError;

/// Errors that can occur in the synchronization engine.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The swarm configuration failed validation.
    #[error("invalid swarm configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// A field-setup operation failed (random source, placement, matrix).
    #[error("field error: {source}")]
    Field {
        /// The underlying field error.
        #[from]
        source: FieldError,
    },

    /// A visibility row publish had the wrong width.
    #[error("visibility row for fly {fly} has {actual} cells, expected {expected}")]
    RowShape {
        /// The publishing fly.
        fly: usize,
        /// Expected row width (swarm size).
        expected: usize,
        /// Width actually supplied.
        actual: usize,
    },

    /// A fly index was outside the swarm.
    #[error("fly {fly} out of range for swarm of {size}")]
    FlyOutOfRange {
        /// The offending index.
        fly: usize,
        /// The swarm size.
        size: usize,
    },

    /// An actor task failed to join cleanly.
    #[error("actor task failure: {message}")]
    ActorFailure {
        /// Description of the join failure.
        message: String,
    },
}
