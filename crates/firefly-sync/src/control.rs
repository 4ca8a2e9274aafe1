//! Shared run control: start barrier, master clock, stop signal, and the
//! fire-time board.
//!
//! One `RunControl` is shared by the coordinator and every actor task.
//! All fields are atomics: the actors' hot loop polls the stop flag once
//! per tick and never blocks on anything here. The start barrier is the
//! a released flag -- actors spin (at tick granularity) until
//! the coordinator releases them, so no wakeup can be lost.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Shared coordination state for one swarm run.
#[derive(Debug)]
pub struct RunControl {
    /// False until the coordinator releases the start barrier.
    released: AtomicBool,

    /// True once the coordinator requests a cooperative stop.
    stop_requested: AtomicBool,

    /// The coordinator's master clock, wrapped modulo the interval.
    ///
    /// Advanced only by the coordinator; actors read it solely to record
    /// absolute fire times. It never drives actor logic.
    master_clock: AtomicU64,

    /// Cycle length the master clock wraps at.
    interval: u64,

    /// Per-fly master-clock time of the last light-on transition.
    fire_times: Vec<AtomicU64>,
}

impl RunControl {
    /// Create control state for a swarm of `size` flies.
    pub fn new(size: usize, interval: u64) -> Self {
        Self {
            released: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            master_clock: AtomicU64::new(0),
            interval: interval.max(1),
            fire_times: (0..size).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Release the start barrier. Called once, after every actor task has
    /// been spawned.
    pub fn release_start(&self) {
        self.released.store(true, Ordering::Release);
    }

    /// Whether the start barrier has been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Spin at tick granularity until the barrier is released.
    pub async fn wait_for_start(&self, tick: Duration) {
        while !self.is_released() {
            tokio::time::sleep(tick).await;
        }
    }

    /// Raise the cooperative stop signal.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested. Actors poll this once per tick.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Advance the master clock one tick, wrapping modulo the interval.
    /// Only the coordinator calls this.
    pub fn advance_master(&self) {
        let current = self.master_clock.load(Ordering::Acquire);
        let next = current.saturating_add(1);
        let next = if next >= self.interval { 0 } else { next };
        self.master_clock.store(next, Ordering::Release);
    }

    /// Current master-clock value.
    pub fn master_clock(&self) -> u64 {
        self.master_clock.load(Ordering::Acquire)
    }

    /// Record fly `fly`'s light-on transition at the current master clock.
    pub fn record_fire(&self, fly: usize) {
        if let Some(slot) = self.fire_times.get(fly) {
            slot.store(self.master_clock(), Ordering::Release);
        }
    }

    /// The last recorded fire time of fly `fly` (0 if it never fired).
    pub fn fire_time(&self, fly: usize) -> u64 {
        self.fire_times
            .get(fly)
            .map_or(0, |slot| slot.load(Ordering::Acquire))
    }

    /// Number of flies the control board covers.
    pub const fn size(&self) -> usize {
        self.fire_times.len()
    }
}
