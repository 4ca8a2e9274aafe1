//! Error types for the swarm binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run itself, and record export.

/// Top-level error for the swarm binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: firefly_sync::ConfigError,
    },

    /// Placement or distance-matrix construction failed.
    #[error("field error: {source}")]
    Field {
        /// The underlying field error.
        #[from]
        source: firefly_field::FieldError,
    },

    /// A swarm run failed.
    #[error("sync error: {source}")]
    Sync {
        /// The underlying run error.
        #[from]
        source: firefly_sync::SyncError,
    },

    /// Writing the fire-record export failed.
    #[error("export error: {source}")]
    Export {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
