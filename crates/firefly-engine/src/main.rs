//! Firefly swarm binary.
//!
//! This is the main entry point that wires together configuration, the
//! shared random source, placement, the swarm runs, and record export.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `$FIREFLY_CONFIG` or `firefly-config.yaml`
//! 3. Validate the configuration and seed the shared random source
//! 4. Run the selected swarm variant(s)
//! 5. Export the sorted fire records (distance runs)
//! 6. Log the result

mod error;
mod export;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use firefly_field::RandomSource;
use firefly_sync::{NoOpSink, ObserverSink, RunMode, SwarmConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::render::TerminalRenderer;

/// Application entry point for the swarm binary.
///
/// # Errors
///
/// Returns an error if configuration, placement, either swarm run, or
/// the record export fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("firefly-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        flies = config.flies,
        interval = config.interval,
        pulse_width = config.pulse_width,
        tick_ceiling = config.tick_ceiling,
        mode = ?config.mode,
        "Configuration loaded"
    );

    // 3. Validate and seed the shared random source.
    config.validate().map_err(EngineError::from)?;
    let rng = Arc::new(RandomSource::new(config.seed).map_err(EngineError::from)?);
    info!(seed = config.seed, "Random source seeded");

    // 4. Run the selected swarm variant(s).
    if matches!(config.mode, RunMode::Uniform | RunMode::Both) {
        run_uniform(&config, Arc::clone(&rng)).await?;
    }
    if matches!(config.mode, RunMode::Distance | RunMode::Both) {
        run_distance(&config, rng).await?;
    }

    // 6. Log the result.
    info!("firefly-engine shutdown complete");
    Ok(())
}

/// Run the uniform-visibility swarm for the full tick ceiling and log
/// the spread of the final flash windows.
async fn run_uniform(config: &SwarmConfig, rng: Arc<RandomSource>) -> Result<(), EngineError> {
    info!(flies = config.flies, "uniform swarm starting");

    // The uniform model has no positions, so there is nothing to draw.
    let mut sink = NoOpSink;
    let schedules = firefly_sync::run_uniform_swarm(config, rng, &mut sink).await?;

    let min_on = schedules.iter().map(|s| s.on_time()).min().unwrap_or(0);
    let max_on = schedules.iter().map(|s| s.on_time()).max().unwrap_or(0);
    info!(
        flies = schedules.len(),
        min_on, max_on, "uniform swarm finished"
    );
    Ok(())
}

/// Place the swarm, run the distance-weighted variant to synchrony or
/// the ceiling, and export the sorted fire records.
async fn run_distance(config: &SwarmConfig, rng: Arc<RandomSource>) -> Result<(), EngineError> {
    let (field, distances) = firefly_sync::place_swarm(config, &rng)?;
    info!(
        flies = field.len(),
        rows = field.rows(),
        cols = field.cols(),
        "swarm placed"
    );

    let mut sink: Box<dyn ObserverSink> = if config.render {
        Box::new(TerminalRenderer::new(
            field.positions().to_vec(),
            config.grid_rows,
            render_stride(config),
        ))
    } else {
        Box::new(NoOpSink)
    };

    let report =
        firefly_sync::run_distant_swarm(config, &field, Arc::new(distances), rng, sink.as_mut())
            .await?;
    info!(
        end_reason = ?report.end_reason,
        ticks_run = report.ticks_run,
        "distance swarm finished"
    );

    // 5. Export the sorted fire records.
    export::write_fire_records(Path::new(&config.export_path), &report.records)?;
    Ok(())
}

/// Load the swarm configuration.
///
/// `$FIREFLY_CONFIG` overrides the default `firefly-config.yaml` path;
/// a missing file falls back to the built-in defaults.
fn load_config() -> Result<SwarmConfig, EngineError> {
    let path = std::env::var("FIREFLY_CONFIG")
        .map_or_else(|_env| PathBuf::from("firefly-config.yaml"), PathBuf::from);
    if path.exists() {
        info!(path = %path.display(), "loading config file");
        Ok(SwarmConfig::from_file(&path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SwarmConfig::default())
    }
}

/// Redraw roughly every 25 real milliseconds.
fn render_stride(config: &SwarmConfig) -> u64 {
    25_u64.checked_div(config.tick_ms).unwrap_or(25).max(1)
}
