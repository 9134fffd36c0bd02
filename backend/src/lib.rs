//! Preemption Simulator Core - Rust Engine
//!
//! Tick-driven simulator for placing infinite-duration jobs across cloud
//! regions that evict them at random.
//!
//! # Architecture
//!
//! - **core**: Simulation clock
//! - **models**: Domain types (Job, Region, SimulationState, events)
//! - **policy**: Placement policies (random, least_loaded, epsilon_greedy)
//! - **scheduler**: Per-tick placement of unassigned jobs
//! - **environment**: Main simulation loop and run summary
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. A job is in at most one region, and that region agrees with the job
//! 2. All randomness is deterministic (seeded RNG) or explicitly injected
//! 3. Time is passed explicitly; there is no global clock

// Module declarations
pub mod core;
pub mod environment;
pub mod models;
pub mod policy;
pub mod rng;
pub mod scheduler;

// Re-exports for convenience
pub use crate::core::time::Clock;
pub use environment::{
    Environment, EnvironmentConfig, JobConfig, JobSummary, RegionConfig, RegionSummary,
    SimulationError, SimulationSummary, TickResult,
};
pub use models::{
    event::{Event, EventLog},
    job::{Job, JobId, JobRecord, JobState},
    region::{EvictionRecord, Region, RegionError, RegionId},
    state::{Eviction, SimulationState, StateError},
};
pub use policy::{PlacementPolicy, PlacementReason, PolicyConfig, PolicyError};
pub use rng::{RandomSource, RngManager, ScriptedRng};
pub use scheduler::{Placement, Scheduler};
