//! The coordinator: master clock, start barrier, detection loop, drain,
//! and fire-record extraction.
//!
//! The coordinator owns the run lifecycle:
//!
//! ```text
//! Init -> BarrierReleased -> Running -> Settling -> Detecting
//!      -> Stopping -> Drained -> Done
//! ```
//!
//! It spawns one task per fly, releases the start barrier, then loops for
//! at most the configured tick ceiling: sample a [`SwarmSnapshot`] for the
//! observer sink, check the synchrony predicate (suppressed during the
//! settle window), sleep one tick, advance the master clock. On exit it
//! raises the cooperative stop signal, drains the actor tasks within a
//! grace period, and extracts the sorted fire records.
//!
//! The master clock is advanced independently of every actor's private
//! clock and is used only to record absolute fire times.

use std::sync::Arc;
use std::time::Duration;

use firefly_field::{DistanceMatrix, PositionField, RandomSource};
use firefly_types::{FireRecord, FlyId, RunEndReason, SwarmSnapshot};
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actor::{DistantFly, UniformFly};
use crate::config::SwarmConfig;
use crate::control::RunControl;
use crate::light::LightField;
use crate::schedule::FlashSchedule;
use crate::visibility::VisibilityMatrix;
use crate::SyncError;

/// Coordinator lifecycle phase, tracked for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Shared state constructed, no actor spawned yet.
    Init,
    /// All actors spawned and the start barrier released.
    BarrierReleased,
    /// Tick loop entered.
    Running,
    /// Inside the settle window; detection suppressed.
    Settling,
    /// Settle window passed; checking the synchrony predicate each tick.
    Detecting,
    /// Stop signal raised.
    Stopping,
    /// All actors joined (or the grace period elapsed).
    Drained,
    /// Records extracted; terminal.
    Done,
}

/// Callback invoked with a read-only snapshot once per coordinator tick.
///
/// The rendering collaborator implements this; the core never formats or
/// draws anything itself.
pub trait ObserverSink: Send {
    /// Called once per coordinator tick with the sampled state.
    fn on_tick(&mut self, snapshot: &SwarmSnapshot);
}

/// A sink that discards every snapshot (for tests and headless runs).
#[derive(Debug, Default)]
pub struct NoOpSink;

impl ObserverSink for NoOpSink {
    fn on_tick(&mut self, _snapshot: &SwarmSnapshot) {}
}

/// Result of a distance-model swarm run.
#[derive(Debug)]
pub struct RunReport {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// Coordinator ticks executed before stopping.
    pub ticks_run: u64,
    /// One record per fly, sorted by fire time, then row, then column.
    pub records: Vec<FireRecord>,
    /// Final per-fly schedules (empty if the drain grace period elapsed).
    pub schedules: Vec<FlashSchedule>,
}

/// Place a swarm and build its distance matrix from the configuration.
///
/// # Errors
///
/// Returns [`SyncError::InvalidConfig`] for a rejected configuration or a
/// field error for impossible placement.
pub fn place_swarm(
    config: &SwarmConfig,
    rng: &RandomSource,
) -> Result<(PositionField, DistanceMatrix), SyncError> {
    config.validate()?;
    let field = PositionField::place(rng, config.flies, config.grid_rows, config.grid_cols)?;
    let distances = DistanceMatrix::from_positions(&field);
    Ok((field, distances))
}

/// Run the distance-weighted swarm to synchrony or the tick ceiling.
///
/// # Errors
///
/// Returns [`SyncError::InvalidConfig`] if the configuration, field, and
/// distance matrix disagree on the swarm size, or an actor error
/// surfaced during the drain.
#[allow(clippy::too_many_lines)]
pub async fn run_distant_swarm(
    config: &SwarmConfig,
    field: &PositionField,
    distances: Arc<DistanceMatrix>,
    rng: Arc<RandomSource>,
    sink: &mut dyn ObserverSink,
) -> Result<RunReport, SyncError> {
    config.validate()?;
    let flies = config.flies;
    if field.len() != flies {
        return Err(SyncError::InvalidConfig {
            reason: format!("field holds {} positions for {flies} flies", field.len()),
        });
    }
    if distances.size() != flies {
        return Err(SyncError::InvalidConfig {
            reason: format!(
                "distance matrix covers {} flies, expected {flies}",
                distances.size()
            ),
        });
    }

    let interval = u64::try_from(config.interval).unwrap_or(1);
    let control = Arc::new(RunControl::new(flies, interval));
    let visibility = Arc::new(VisibilityMatrix::new(flies));
    let lights = Arc::new(LightField::new(flies));

    let mut phase = RunPhase::Init;
    debug!(?phase, flies, "distant swarm setup");

    let handles: Vec<JoinHandle<Result<FlashSchedule, SyncError>>> = (0..flies)
        .map(|id| {
            let fly = DistantFly::new(
                id,
                config,
                Arc::clone(&distances),
                Arc::clone(&visibility),
                Arc::clone(&lights),
                Arc::clone(&control),
                Arc::clone(&rng),
            );
            tokio::spawn(fly.run())
        })
        .collect();

    control.release_start();
    phase = RunPhase::BarrierReleased;
    info!(?phase, flies, "start barrier released");

    let settle = config.settle_ticks();
    let tick = config.tick_duration();
    let mut end_reason = RunEndReason::TickCeilingReached;
    let mut ticks_run: u64 = 0;

    phase = RunPhase::Running;
    debug!(?phase, ceiling = config.tick_ceiling, settle, "tick loop entered");

    for tick_index in 0..config.tick_ceiling {
        let snapshot = SwarmSnapshot {
            tick: tick_index,
            lights: lights.snapshot(),
            visibility: visibility.snapshot().await,
        };
        sink.on_tick(&snapshot);

        if tick_index < settle {
            if phase != RunPhase::Settling {
                phase = RunPhase::Settling;
                debug!(?phase, settle, "detection suppressed for the settle window");
            }
        } else {
            if phase != RunPhase::Detecting {
                phase = RunPhase::Detecting;
                debug!(?phase, tick_index, "synchrony detection armed");
            }
            if visibility.all_visible().await {
                info!(tick = tick_index, "synchrony detected");
                end_reason = RunEndReason::SynchronyDetected;
                break;
            }
        }

        tokio::time::sleep(tick).await;
        control.advance_master();
        ticks_run = ticks_run.saturating_add(1);
    }

    phase = RunPhase::Stopping;
    info!(?phase, ticks_run, "raising stop signal");
    control.request_stop();

    let schedules = drain(handles, grace_period(config)).await?;
    phase = RunPhase::Drained;
    debug!(?phase, joined = schedules.len(), "actors drained");

    let mut records: Vec<FireRecord> = field
        .positions()
        .iter()
        .enumerate()
        .map(|(id, position)| {
            FireRecord::new(
                control.fire_time(id),
                FlyId::new(id),
                position.row,
                position.col,
            )
        })
        .collect();
    records.sort_unstable();

    phase = RunPhase::Done;
    info!(?phase, ?end_reason, ticks_run, "distant swarm run complete");

    Ok(RunReport {
        end_reason,
        ticks_run,
        records,
        schedules,
    })
}

/// Run the uniform-visibility swarm for the full tick ceiling.
///
/// The uniform model has no visibility matrix, so there is nothing to
/// detect synchrony against: this is a bounded watch. Returns the final
/// per-fly schedules.
///
/// # Errors
///
/// Returns [`SyncError::InvalidConfig`] for a rejected configuration or
/// an actor error surfaced during the drain.
pub async fn run_uniform_swarm(
    config: &SwarmConfig,
    rng: Arc<RandomSource>,
    sink: &mut dyn ObserverSink,
) -> Result<Vec<FlashSchedule>, SyncError> {
    config.validate()?;
    let flies = config.flies;
    let interval = u64::try_from(config.interval).unwrap_or(1);
    let control = Arc::new(RunControl::new(flies, interval));
    let lights = Arc::new(LightField::new(flies));

    let handles: Vec<JoinHandle<Result<FlashSchedule, SyncError>>> = (0..flies)
        .map(|id| {
            let fly = UniformFly::new(
                id,
                config,
                Arc::clone(&lights),
                Arc::clone(&control),
                Arc::clone(&rng),
            );
            tokio::spawn(fly.run())
        })
        .collect();

    control.release_start();
    info!(flies, ceiling = config.tick_ceiling, "uniform swarm started");

    let tick = config.tick_duration();
    for tick_index in 0..config.tick_ceiling {
        let snapshot = SwarmSnapshot {
            tick: tick_index,
            lights: lights.snapshot(),
            visibility: Vec::new(),
        };
        sink.on_tick(&snapshot);
        tokio::time::sleep(tick).await;
        control.advance_master();
    }

    control.request_stop();
    let schedules = drain(handles, grace_period(config)).await?;
    info!(joined = schedules.len(), "uniform swarm run complete");
    Ok(schedules)
}

/// How long to wait for actors to observe the stop signal and exit.
///
/// An actor may still be inside its start jitter sleep when stop is
/// raised, so the grace period covers the full jitter plus a few ticks
/// and a constant floor for scheduler slack.
fn grace_period(config: &SwarmConfig) -> Duration {
    let jitter = u64::try_from(config.start_jitter_max).unwrap_or(0);
    let ticks = jitter.saturating_add(8);
    Duration::from_millis(config.tick_ms.saturating_mul(ticks).saturating_add(500))
}

/// Await every actor handle within the grace period.
///
/// A timed-out drain is logged and yields no schedules; a panicked actor
/// surfaces as [`SyncError::ActorFailure`].
async fn drain(
    handles: Vec<JoinHandle<Result<FlashSchedule, SyncError>>>,
    grace: Duration,
) -> Result<Vec<FlashSchedule>, SyncError> {
    match tokio::time::timeout(grace, join_all(handles)).await {
        Ok(results) => {
            let mut schedules = Vec::with_capacity(results.len());
            for result in results {
                match result {
                    Ok(Ok(schedule)) => schedules.push(schedule),
                    Ok(Err(error)) => return Err(error),
                    Err(join_error) => {
                        return Err(SyncError::ActorFailure {
                            message: join_error.to_string(),
                        });
                    }
                }
            }
            Ok(schedules)
        }
        Err(_elapsed) => {
            warn!(?grace, "actors did not drain within the grace period");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use firefly_types::GridPosition;

    use super::*;

    /// A sink that counts ticks and remembers the last snapshot.
    struct CountingSink {
        ticks: u64,
        last: Option<SwarmSnapshot>,
    }

    impl CountingSink {
        const fn new() -> Self {
            Self {
                ticks: 0,
                last: None,
            }
        }
    }

    impl ObserverSink for CountingSink {
        fn on_tick(&mut self, snapshot: &SwarmSnapshot) {
            self.ticks = self.ticks.saturating_add(1);
            self.last = Some(snapshot.clone());
        }
    }

    fn cluster_config() -> SwarmConfig {
        SwarmConfig {
            flies: 3,
            interval: 100,
            pulse_width: 40,
            grid_rows: 24,
            grid_cols: 79,
            settle_fraction: 0.025,
            tick_ceiling: 20_000,
            seed: 0xCEED_BA11,
            tick_ms: 1,
            start_jitter_max: 50,
            ..SwarmConfig::default()
        }
    }

    fn cluster_field() -> PositionField {
        PositionField::from_parts(
            vec![
                GridPosition::new(1, 1),
                GridPosition::new(1, 2),
                GridPosition::new(2, 1),
            ],
            24,
            79,
        )
    }

    #[test]
    fn place_swarm_matches_config() {
        let config = SwarmConfig {
            flies: 12,
            ..SwarmConfig::default()
        };
        let rng = RandomSource::new(config.seed).unwrap();
        let (field, distances) = place_swarm(&config, &rng).unwrap();
        assert_eq!(field.len(), 12);
        assert_eq!(distances.size(), 12);
    }

    #[tokio::test]
    async fn mismatched_field_is_rejected() {
        let config = cluster_config();
        let field = PositionField::from_parts(vec![GridPosition::new(1, 1)], 24, 79);
        let distances = Arc::new(DistanceMatrix::from_parts(vec![vec![0]]).unwrap());
        let rng = Arc::new(RandomSource::new(1).unwrap());
        let mut sink = NoOpSink;

        let result = run_distant_swarm(&config, &field, distances, rng, &mut sink).await;
        assert!(matches!(result, Err(SyncError::InvalidConfig { .. })));
    }

    /// A tight cluster with a fixed seed must reach full mutual
    /// visibility well before the tick ceiling.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn clustered_swarm_synchronizes() {
        let config = cluster_config();
        let field = cluster_field();
        let distances = Arc::new(DistanceMatrix::from_positions(&field));
        let rng = Arc::new(RandomSource::new(config.seed).unwrap());
        let mut sink = NoOpSink;

        let report = run_distant_swarm(&config, &field, distances, rng, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.end_reason, RunEndReason::SynchronyDetected);
        assert!(report.ticks_run < config.tick_ceiling);
        assert_eq!(report.records.len(), 3);
        for pair in report.records.windows(2) {
            if let [a, b] = pair {
                assert!(a <= b, "records are not sorted: {a:?} > {b:?}");
            }
        }
    }

    /// One fly pushed far outside everyone's delay horizon: synchrony is
    /// never detected, the run ends at the ceiling, and nothing divides
    /// by zero along the way.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn isolated_fly_runs_to_the_ceiling() {
        let config = SwarmConfig {
            tick_ceiling: 300,
            settle_fraction: 0.5,
            start_jitter_max: 10,
            ..cluster_config()
        };
        let field = PositionField::from_parts(
            vec![
                GridPosition::new(1, 1),
                GridPosition::new(1, 2),
                GridPosition::new(20, 70),
            ],
            24,
            79,
        );
        let distances = Arc::new(
            DistanceMatrix::from_parts(vec![
                vec![0, 1, 5000],
                vec![1, 0, 5000],
                vec![5000, 5000, 0],
            ])
            .unwrap(),
        );
        let rng = Arc::new(RandomSource::new(99).unwrap());
        let mut sink = NoOpSink;

        let report = run_distant_swarm(&config, &field, distances, rng, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.end_reason, RunEndReason::TickCeilingReached);
        assert_eq!(report.ticks_run, 300);
        assert_eq!(report.records.len(), 3);
        // The isolated fly never observed a peer, so its schedule is
        // still the initial one.
        let isolated = report
            .schedules
            .iter()
            .find(|s| s.on_time() == 0 && s.off_time() == config.pulse_width);
        assert!(isolated.is_some(), "isolated fly should never recenter");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn uniform_swarm_runs_the_full_ceiling() {
        let config = SwarmConfig {
            flies: 2,
            interval: 30,
            pulse_width: 10,
            tick_ceiling: 100,
            tick_ms: 1,
            start_jitter_max: 5,
            ..SwarmConfig::default()
        };
        let rng = Arc::new(RandomSource::new(7).unwrap());
        let mut sink = CountingSink::new();

        let schedules = run_uniform_swarm(&config, rng, &mut sink).await.unwrap();

        assert_eq!(schedules.len(), 2);
        assert_eq!(sink.ticks, 100);
        let last = sink.last.unwrap();
        assert_eq!(last.lights.len(), 2);
        assert!(last.visibility.is_empty());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_spawning() {
        let config = SwarmConfig {
            flies: 0,
            ..SwarmConfig::default()
        };
        let rng = Arc::new(RandomSource::new(7).unwrap());
        let mut sink = NoOpSink;
        let result = run_uniform_swarm(&config, rng, &mut sink).await;
        assert!(matches!(result, Err(SyncError::InvalidConfig { .. })));
    }
}
