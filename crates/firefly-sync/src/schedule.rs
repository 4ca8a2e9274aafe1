//! Flash schedules and per-cycle observation accumulation.
//!
//! This is the pure heart of the Buck & Buck recentering model: a fly's
//! on/off window within its private clock cycle, and the running
//! (weighted) sum of observed flash ticks from which the next window is
//! derived at cycle end.
//!
//! The distance-weighted model adds `counter * distance` to the sum and
//! `distance` to the weight for each visible peer -- distance acts as the
//! peer's contribution strength, which *amplifies* far peers rather than
//! attenuating them. That is the Buck & Buck-era formulation and is kept
//! verbatim; it is a modeling choice, not a defect.

/// A fly's on/off window within its private `[0, interval)` clock cycle.
///
/// The window may wrap through zero (`off_time < on_time`). The lit test
/// also accepts negative counters, which arise when a peer's clock is
/// backdated by signal-propagation delay: a negative counter reads as lit
/// inside a wrapped window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSchedule {
    on_time: i64,
    off_time: i64,
    interval: i64,
    pulse_width: i64,
}

impl FlashSchedule {
    /// Create the initial schedule: light on at clock 0 for one pulse.
    pub const fn new(interval: i64, pulse_width: i64) -> Self {
        Self {
            on_time: 0,
            off_time: pulse_width,
            interval,
            pulse_width,
        }
    }

    /// Create a schedule from explicit parts (useful for testing).
    pub const fn from_parts(
        on_time: i64,
        off_time: i64,
        interval: i64,
        pulse_width: i64,
    ) -> Self {
        Self {
            on_time,
            off_time,
            interval,
            pulse_width,
        }
    }

    /// Whether the light is on at the given counter value.
    pub const fn is_lit(&self, counter: i64) -> bool {
        if self.off_time > self.on_time {
            // Window does not wrap through zero.
            counter >= self.on_time && counter < self.off_time
        } else {
            counter >= self.on_time || counter < self.off_time
        }
    }

    /// Recenter the window on a mean observed flash tick.
    ///
    /// The new on-time is `mean - pulse_width / 2`, wrapped into
    /// `[0, interval)` by adding one interval when negative; the off-time
    /// follows one pulse later, modulo the interval.
    pub fn recenter(&mut self, mean_tick: i64) {
        let half = self.pulse_width.checked_div(2).unwrap_or(0);
        let mut on = mean_tick.saturating_sub(half);
        if on < 0 {
            on = on.saturating_add(self.interval);
        }
        self.on_time = on;
        self.off_time = on
            .saturating_add(self.pulse_width)
            .checked_rem(self.interval)
            .unwrap_or(0);
    }

    /// Tick at which the light turns on.
    pub const fn on_time(&self) -> i64 {
        self.on_time
    }

    /// Tick at which the light turns off.
    pub const fn off_time(&self) -> i64 {
        self.off_time
    }

    /// The configured cycle length.
    pub const fn interval(&self) -> i64 {
        self.interval
    }

    /// The configured pulse width.
    pub const fn pulse_width(&self) -> i64 {
        self.pulse_width
    }
}

/// Running observation sums for one clock cycle.
///
/// The uniform model observes with weight 1 per lit peer; the distance
/// model observes with the peer's distance as the weight. A cycle with
/// zero accumulated weight yields no mean: the caller skips recentering
/// and the schedule stays unchanged (never a division by zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleAccumulator {
    sum: i64,
    weight: i64,
}

impl CycleAccumulator {
    /// Create an empty accumulator.
    pub const fn new() -> Self {
        Self { sum: 0, weight: 0 }
    }

    /// Record one observation: a lit peer seen at `tick` with the given
    /// weight (1 for uniform visibility, the peer distance otherwise).
    pub const fn observe(&mut self, tick: i64, weight: i64) {
        self.sum = self.sum.saturating_add(tick.saturating_mul(weight));
        self.weight = self.weight.saturating_add(weight);
    }

    /// The weighted mean observed tick, or `None` for a silent cycle.
    pub const fn mean(&self) -> Option<i64> {
        if self.weight > 0 {
            self.sum.checked_div(self.weight)
        } else {
            None
        }
    }

    /// Total accumulated weight this cycle.
    pub const fn weight(&self) -> i64 {
        self.weight
    }

    /// Clear the sums for the next cycle.
    pub const fn reset(&mut self) {
        self.sum = 0;
        self.weight = 0;
    }
}
