//! Configuration loading and typed config structures for swarm runs.
//!
//! The canonical configuration lives in `firefly-config.yaml` at the
//! project root. This module defines a strongly-typed struct mirroring the
//! YAML structure, a loader, and the validation that rejects impossible
//! runs before any actor is spawned.

use std::path::Path;

use serde::Deserialize;

use crate::SyncError;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Which swarm variant(s) a run executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Uniform-visibility flies only (no positions, no detection).
    Uniform,
    /// Distance-weighted flies only (full detection pipeline).
    Distance,
    /// The uniform demonstration followed by the distance run.
    #[default]
    Both,
}

/// Top-level swarm configuration.
///
/// All fields have defaults suited to the standard demonstration run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwarmConfig {
    /// Number of fireflies to spawn.
    #[serde(default = "default_flies")]
    pub flies: usize,

    /// Full cycle length in logical ticks.
    #[serde(default = "default_interval")]
    pub interval: i64,

    /// Ticks the light stays on within one cycle.
    #[serde(default = "default_pulse_width")]
    pub pulse_width: i64,

    /// Grid row bound for placement.
    #[serde(default = "default_grid_rows")]
    pub grid_rows: u32,

    /// Grid column bound for placement.
    #[serde(default = "default_grid_cols")]
    pub grid_cols: u32,

    /// Fraction of the tick ceiling during which synchrony detection is
    /// suppressed (the settle window).
    #[serde(default = "default_settle_fraction")]
    pub settle_fraction: f64,

    /// Hard ceiling on coordinator ticks for one run.
    #[serde(default = "default_tick_ceiling")]
    pub tick_ceiling: u64,

    /// Seed for the shared random source (must be non-zero).
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per logical tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Upper bound, in ticks, of each actor's random start jitter.
    #[serde(default = "default_start_jitter_max")]
    pub start_jitter_max: i64,

    /// Which swarm variant(s) to run.
    #[serde(default)]
    pub mode: RunMode,

    /// Where the export collaborator writes the sorted fire records.
    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Whether the terminal renderer is attached to the run.
    #[serde(default = "default_render")]
    pub render: bool,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            flies: default_flies(),
            interval: default_interval(),
            pulse_width: default_pulse_width(),
            grid_rows: default_grid_rows(),
            grid_cols: default_grid_cols(),
            settle_fraction: default_settle_fraction(),
            tick_ceiling: default_tick_ceiling(),
            seed: default_seed(),
            tick_ms: default_tick_ms(),
            start_jitter_max: default_start_jitter_max(),
            mode: RunMode::default(),
            export_path: default_export_path(),
            render: default_render(),
        }
    }
}

impl SwarmConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Validate the configuration. Called before any actor spawns;
    /// nothing is clamped silently.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] naming the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.flies == 0 {
            return Err(invalid("at least one fly is required"));
        }
        if self.interval < 1 {
            return Err(invalid("interval must be at least 1 tick"));
        }
        if self.pulse_width < 1 || self.pulse_width >= self.interval {
            return Err(invalid("pulse_width must be in [1, interval)"));
        }
        if !(0.0..1.0).contains(&self.settle_fraction) {
            return Err(invalid("settle_fraction must be in [0, 1)"));
        }
        if self.tick_ceiling == 0 {
            return Err(invalid("tick_ceiling must be at least 1"));
        }
        if self.seed == 0 {
            return Err(invalid("seed must be non-zero"));
        }
        if self.start_jitter_max < 0 {
            return Err(invalid("start_jitter_max must be non-negative"));
        }
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(invalid("grid bounds must be at least 1x1"));
        }
        let cells = u64::from(self.grid_rows).saturating_mul(u64::from(self.grid_cols));
        let flies = u64::try_from(self.flies).unwrap_or(u64::MAX);
        if flies > cells {
            return Err(invalid("more flies than grid cells; placement is impossible"));
        }
        Ok(())
    }

    /// Number of initial ticks during which synchrony detection is
    /// suppressed.
    pub fn settle_ticks(&self) -> u64 {
        // settle_fraction is validated into [0, 1), so the product is
        // non-negative and strictly below the ceiling; the conversions
        // cannot lose anything that matters at simulation scale.
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            (self.settle_fraction * self.tick_ceiling as f64).floor() as u64
        }
    }

    /// Real-time duration of one logical tick.
    pub const fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms)
    }
}

/// Shorthand for an [`SyncError::InvalidConfig`].
fn invalid(reason: &str) -> SyncError {
    SyncError::InvalidConfig {
        reason: reason.to_owned(),
    }
}

const fn default_flies() -> usize {
    64
}

const fn default_interval() -> i64 {
    1000
}

const fn default_pulse_width() -> i64 {
    175
}

const fn default_grid_rows() -> u32 {
    24
}

const fn default_grid_cols() -> u32 {
    79
}

const fn default_settle_fraction() -> f64 {
    0.5
}

const fn default_tick_ceiling() -> u64 {
    60_000
}

const fn default_seed() -> u64 {
    firefly_field::rng::DEFAULT_SEED
}

const fn default_tick_ms() -> u64 {
    1
}

const fn default_start_jitter_max() -> i64 {
    500
}

fn default_export_path() -> String {
    String::from("flyout.csv")
}

const fn default_render() -> bool {
    false
}
