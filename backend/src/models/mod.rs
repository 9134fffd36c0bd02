//! Domain models for the preemption simulator

pub mod event;
pub mod job;
pub mod region;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use job::{Job, JobId, JobRecord, JobState};
pub use region::{EvictionRecord, Region, RegionError, RegionId};
pub use state::{Eviction, SimulationState, StateError};
