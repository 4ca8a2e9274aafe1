//! Swarm synchronization core: per-fly actors, shared coordination
//! state, and the run coordinator.
//!
//! The model is the Buck & Buck firefly account: every fly flashes on a
//! fixed-length cycle and, at each cycle end, recenters its flash window
//! on the mean observed flash time of its peers. Two observation models
//! are provided:
//!
//! - **uniform**: every flash is seen by everyone instantly, all
//!   observations weigh the same ([`actor::UniformFly`]);
//! - **distance**: flashes propagate with per-pair delay, observations
//!   are judged through the shared [`visibility::VisibilityMatrix`] and
//!   weighted by distance ([`actor::DistantFly`]).
//!
//! [`coordinator::run_distant_swarm`] and
//! [`coordinator::run_uniform_swarm`] wire a configured swarm together
//! and drive it to synchrony or the tick ceiling.

pub mod actor;
pub mod config;
pub mod control;
pub mod coordinator;
mod error;
pub mod light;
pub mod schedule;
pub mod visibility;

pub use config::{ConfigError, RunMode, SwarmConfig};
pub use coordinator::{
    NoOpSink, ObserverSink, RunPhase, RunReport, place_swarm, run_distant_swarm,
    run_uniform_swarm,
};
pub use error::SyncError;
pub use schedule::{CycleAccumulator, FlashSchedule};
