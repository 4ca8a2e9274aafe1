//! The per-firefly actor tasks.
//!
//! Each fly is one tokio task running its own private clock. A tick is
//! one simulated millisecond: toggle the light against the schedule,
//! observe peers, advance the clock, recenter at cycle end, sleep one
//! tick, and poll the stop flag. Nothing preempts an actor mid-step.
//!
//! Two variants exist:
//!
//! - [`UniformFly`] observes the shared [`LightField`] directly -- every
//!   peer's flash is seen instantly and weighs the same.
//! - [`DistantFly`] publishes its own delay-backdated visibility row and
//!   judges peers only by *their* published rows (the reciprocal-publish
//!   convention), weighting each observation by the peer's distance.
//!
//! Scheduler jitter makes each actor's notion of "current tick" drift
//! independently; that drift is part of the modeled phenomenon.

use std::sync::Arc;
use std::time::Duration;

use firefly_field::{DistanceMatrix, RandomSource};
use tracing::{debug, trace};

use crate::config::SwarmConfig;
use crate::control::RunControl;
use crate::light::LightField;
use crate::schedule::{CycleAccumulator, FlashSchedule};
use crate::visibility::VisibilityMatrix;
use crate::SyncError;

/// A firefly in the uniform-visibility model.
#[derive(Debug)]
pub struct UniformFly {
    id: usize,
    schedule: FlashSchedule,
    jitter_max: i64,
    tick: Duration,
    lights: Arc<LightField>,
    control: Arc<RunControl>,
    rng: Arc<RandomSource>,
}

impl UniformFly {
    /// Create a fly with the initial light-on-at-zero schedule.
    pub fn new(
        id: usize,
        config: &SwarmConfig,
        lights: Arc<LightField>,
        control: Arc<RunControl>,
        rng: Arc<RandomSource>,
    ) -> Self {
        Self {
            id,
            schedule: FlashSchedule::new(config.interval, config.pulse_width),
            jitter_max: config.start_jitter_max,
            tick: config.tick_duration(),
            lights,
            control,
            rng,
        }
    }

    /// Run the fly until the stop signal is observed. Returns the final
    /// schedule.
    pub async fn run(mut self) -> Result<FlashSchedule, SyncError> {
        self.control.wait_for_start(self.tick).await;
        desync_sleep(self.id, &self.rng, self.jitter_max, self.tick).await?;

        let peers = self.lights.len();
        let mut clock: i64 = 0;
        let mut acc = CycleAccumulator::new();

        while !self.control.stop_requested() {
            if clock == self.schedule.on_time() {
                self.lights.set(self.id, true);
                self.control.record_fire(self.id);
            }
            if clock == self.schedule.off_time() {
                self.lights.set(self.id, false);
            }

            // Unweighted observation: every lit peer counts once, at the
            // current value of this fly's own clock.
            for peer in 0..peers {
                if peer != self.id && self.lights.get(peer) {
                    acc.observe(clock, 1);
                }
            }

            clock = clock.saturating_add(1);
            if clock >= self.schedule.interval() {
                if let Some(mean) = acc.mean() {
                    self.schedule.recenter(mean);
                    trace!(
                        fly = self.id,
                        mean,
                        on = self.schedule.on_time(),
                        "recentered"
                    );
                }
                acc.reset();
                clock = 0;
            }

            tokio::time::sleep(self.tick).await;
        }

        self.lights.set(self.id, false);
        debug!(fly = self.id, "uniform fly stopped");
        Ok(self.schedule)
    }
}

/// A firefly in the distance-weighted model.
#[derive(Debug)]
pub struct DistantFly {
    id: usize,
    schedule: FlashSchedule,
    jitter_max: i64,
    tick: Duration,
    distances: Arc<DistanceMatrix>,
    visibility: Arc<VisibilityMatrix>,
    lights: Arc<LightField>,
    control: Arc<RunControl>,
    rng: Arc<RandomSource>,
}

impl DistantFly {
    /// Create a fly with the initial light-on-at-zero schedule.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        config: &SwarmConfig,
        distances: Arc<DistanceMatrix>,
        visibility: Arc<VisibilityMatrix>,
        lights: Arc<LightField>,
        control: Arc<RunControl>,
        rng: Arc<RandomSource>,
    ) -> Self {
        Self {
            id,
            schedule: FlashSchedule::new(config.interval, config.pulse_width),
            jitter_max: config.start_jitter_max,
            tick: config.tick_duration(),
            distances,
            visibility,
            lights,
            control,
            rng,
        }
    }

    /// Run the fly until the stop signal is observed. Returns the final
    /// schedule.
    pub async fn run(mut self) -> Result<FlashSchedule, SyncError> {
        self.control.wait_for_start(self.tick).await;
        desync_sleep(self.id, &self.rng, self.jitter_max, self.tick).await?;

        let peers = self.distances.size();
        let mut clock: i64 = 0;
        let mut acc = CycleAccumulator::new();

        while !self.control.stop_requested() {
            if clock == self.schedule.on_time() {
                self.lights.set(self.id, true);
                self.control.record_fire(self.id);
            }
            if clock == self.schedule.off_time() {
                self.lights.set(self.id, false);
            }

            // A peer `distance` units away will not see this fly's light
            // for `distance` more ticks: publish, per peer, whether the
            // backdated counter falls inside this fly's own window.
            let row: Vec<bool> = (0..peers)
                .map(|peer| {
                    let delay = self.distances.distance(self.id, peer);
                    self.schedule.is_lit(clock.saturating_sub(delay))
                })
                .collect();

            let observers = self.visibility.publish_and_observe(self.id, row).await?;
            accumulate_visible(&mut acc, self.id, clock, &observers, &self.distances);

            clock = clock.saturating_add(1);
            if clock >= self.schedule.interval() {
                if let Some(mean) = acc.mean() {
                    self.schedule.recenter(mean);
                    trace!(
                        fly = self.id,
                        mean,
                        on = self.schedule.on_time(),
                        "recentered"
                    );
                }
                acc.reset();
                clock = 0;
            }

            tokio::time::sleep(self.tick).await;
        }

        self.lights.set(self.id, false);
        debug!(fly = self.id, "distant fly stopped");
        Ok(self.schedule)
    }
}

/// Accumulate this tick's distance-weighted observations.
///
/// `observers` is column `me` of the visibility matrix: cell `j` is what
/// peer `j` itself published about reaching this fly. Each visible peer
/// contributes `clock * distance` to the sum and `distance` to the
/// weight.
pub(crate) fn accumulate_visible(
    acc: &mut CycleAccumulator,
    me: usize,
    clock: i64,
    observers: &[bool],
    distances: &DistanceMatrix,
) {
    for (peer, seen) in observers.iter().enumerate() {
        if peer != me && *seen {
            acc.observe(clock, distances.distance(me, peer));
        }
    }
}

/// Sleep a random 0..=`jitter_max` ticks so actors do not begin aligned.
async fn desync_sleep(
    id: usize,
    rng: &RandomSource,
    jitter_max: i64,
    tick: Duration,
) -> Result<(), SyncError> {
    let jitter = rng.next_in_range(0, jitter_max)?;
    let jitter_ticks = u32::try_from(jitter).unwrap_or(u32::MAX);
    debug!(fly = id, jitter, "fly released");
    tokio::time::sleep(tick.saturating_mul(jitter_ticks)).await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::SwarmConfig;

    fn tiny_config(flies: usize, interval: i64, pulse: i64) -> SwarmConfig {
        SwarmConfig {
            flies,
            interval,
            pulse_width: pulse,
            grid_rows: 24,
            grid_cols: 79,
            start_jitter_max: 0,
            tick_ms: 0,
            ..SwarmConfig::default()
        }
    }

    /// Scenario: the distance-weighted centroid over a known matrix and
    /// mocked peer visibility matches the hand-computed weighted mean.
    #[test]
    fn weighted_centroid_from_mocked_visibility() {
        let distances = DistanceMatrix::from_parts(vec![
            vec![0, 2, 6, 7],
            vec![2, 0, 3, 4],
            vec![6, 3, 0, 5],
            vec![7, 4, 5, 0],
        ])
        .unwrap();
        let mut acc = CycleAccumulator::new();

        // Tick 100: only the peer at distance 2 is visible.
        accumulate_visible(&mut acc, 0, 100, &[false, true, false, false], &distances);
        // Tick 200: only the peer at distance 6 is visible.
        accumulate_visible(&mut acc, 0, 200, &[false, false, true, false], &distances);

        // sum = 100*2 + 200*6 = 1400, weight = 8 -> mean 175.
        assert_eq!(acc.mean(), Some(175));
    }

    #[test]
    fn own_cell_never_contributes() {
        let distances =
            DistanceMatrix::from_parts(vec![vec![0, 3], vec![3, 0]]).unwrap();
        let mut acc = CycleAccumulator::new();

        accumulate_visible(&mut acc, 0, 100, &[true, false], &distances);
        assert_eq!(acc.mean(), None);
    }

    /// Scenario: a lone fly has no peers, so it never recenters -- but its
    /// light still toggles on its own schedule.
    #[tokio::test]
    async fn lone_uniform_fly_never_recenters() {
        let config = tiny_config(1, 20, 5);
        let lights = Arc::new(LightField::new(1));
        let control = Arc::new(RunControl::new(1, 20));
        let rng = Arc::new(RandomSource::new(7).unwrap());

        let fly = UniformFly::new(
            0,
            &config,
            Arc::clone(&lights),
            Arc::clone(&control),
            Arc::clone(&rng),
        );
        let handle = tokio::spawn(fly.run());

        control.release_start();
        // Sample the light long enough to span several 20-tick cycles.
        let mut seen_on = false;
        let mut seen_off = false;
        for _ in 0..2_000 {
            if lights.get(0) {
                seen_on = true;
            } else {
                seen_off = true;
            }
            tokio::task::yield_now().await;
        }
        control.request_stop();

        let schedule = handle.await.unwrap().unwrap();
        assert_eq!(schedule.on_time(), 0);
        assert_eq!(schedule.off_time(), 5);
        assert!(seen_on && seen_off, "light never toggled");
    }

    /// A lone distant fly keeps publishing rows but never observes a peer
    /// and never recenters.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn lone_distant_fly_never_recenters() {
        let config = tiny_config(1, 20, 5);
        let distances = Arc::new(DistanceMatrix::from_parts(vec![vec![0]]).unwrap());
        let visibility = Arc::new(VisibilityMatrix::new(1));
        let lights = Arc::new(LightField::new(1));
        let control = Arc::new(RunControl::new(1, 20));
        let rng = Arc::new(RandomSource::new(7).unwrap());

        let fly = DistantFly::new(
            0,
            &config,
            Arc::clone(&distances),
            Arc::clone(&visibility),
            Arc::clone(&lights),
            Arc::clone(&control),
            Arc::clone(&rng),
        );
        let handle = tokio::spawn(fly.run());

        control.release_start();
        for _ in 0..500 {
            tokio::task::yield_now().await;
        }
        control.request_stop();

        let schedule = handle.await.unwrap().unwrap();
        assert_eq!(schedule.on_time(), 0);
        assert_eq!(schedule.off_time(), 5);
    }
}
