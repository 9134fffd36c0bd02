//! Environment - main simulation loop
//!
//! Owns the clock, the job/region state and the scheduler, and defines the
//! order of work inside a tick.
//!
//! See `engine.rs` for the tick loop and `summary.rs` for run reporting.

pub mod engine;
pub mod summary;

// Re-export main types for convenience
pub use engine::{
    Environment, EnvironmentConfig, JobConfig, RegionConfig, SimulationError, TickResult,
};
pub use summary::{JobSummary, RegionSummary, SimulationSummary};
