//! Per-tick observation snapshot and run termination reasons.

use serde::{Deserialize, Serialize};

/// Read-only view of the swarm sampled once per coordinator tick.
///
/// This is the only data the rendering collaborator sees: which lights
/// are on, and (for distance runs) the full visibility grid. The core
/// never formats or draws anything itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmSnapshot {
    /// Coordinator tick at which the sample was taken.
    pub tick: u64,
    /// Current light flag of each fly, indexed by fly id.
    pub lights: Vec<bool>,
    /// Visibility grid rows, indexed `[observer][observed]`.
    ///
    /// Empty for uniform-visibility runs, which have no such grid.
    pub visibility: Vec<Vec<bool>>,
}

/// Why a swarm run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEndReason {
    /// Every off-diagonal visibility cell was true after the settle window.
    SynchronyDetected,
    /// The configured tick ceiling was reached without detection.
    TickCeilingReached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_equality() {
        let snapshot = SwarmSnapshot {
            tick: 42,
            lights: vec![true, false],
            visibility: vec![vec![true, true], vec![false, true]],
        };
        assert_eq!(snapshot.clone(), snapshot);
    }
}
