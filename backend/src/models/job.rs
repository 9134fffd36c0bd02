//! Job model
//!
//! A job is an infinite-duration unit of work. It has no terminal state: it
//! is either running in exactly one region or waiting to be placed, and it
//! accumulates running-time statistics for as long as the simulation runs.
//!
//! The region side of an assignment lives in [`Region`]. The two halves are
//! only ever changed together through [`SimulationState::place`] and
//! [`SimulationState::evict`], so the single-sided mutators here are
//! crate-private.
//!
//! [`SimulationState::place`]: crate::models::state::SimulationState::place
//! [`SimulationState::evict`]: crate::models::state::SimulationState::evict

use serde::{Deserialize, Serialize};

use crate::models::region::{Region, RegionId};

/// Index of a job in the simulation state (registration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub usize);

/// Placement state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Waiting for the scheduler
    Unassigned,
    /// Running in a region
    Assigned,
}

/// One tick spent running in a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub tick: usize,
    pub region: String,
}

/// Long-running job
///
/// # Example
///
/// ```
/// use preemption_sim_core::{Job, JobState};
///
/// let job = Job::new("job0");
/// assert_eq!(job.name(), "job0");
/// assert_eq!(job.state(), JobState::Unassigned);
/// assert_eq!(job.total_running_time(), 0);
/// assert_eq!(job.num_preemptions(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    name: String,
    region: Option<RegionId>,
    /// Ticks of continuous residency in the current region
    region_running_time: usize,
    /// Ticks ever spent in any region, never reset
    total_running_time: usize,
    num_preemptions: usize,
    history: Vec<JobRecord>,
}

impl Job {
    /// Create an unassigned job
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            region_running_time: 0,
            total_running_time: 0,
            num_preemptions: 0,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region currently hosting the job
    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    pub fn state(&self) -> JobState {
        match self.region {
            Some(_) => JobState::Assigned,
            None => JobState::Unassigned,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.region.is_some()
    }

    pub fn region_running_time(&self) -> usize {
        self.region_running_time
    }

    pub fn total_running_time(&self) -> usize {
        self.total_running_time
    }

    pub fn num_preemptions(&self) -> usize {
        self.num_preemptions
    }

    /// Every tick the job spent assigned, in order
    pub fn history(&self) -> &[JobRecord] {
        &self.history
    }

    /// Point the job at a region
    ///
    /// Residency starts over, so the region running time is reset.
    pub(crate) fn assign(&mut self, region: RegionId) {
        self.region = Some(region);
        self.region_running_time = 0;
    }

    /// Evicted: back to unassigned, residency reset, one more preemption
    pub(crate) fn preempt(&mut self) {
        self.region = None;
        self.region_running_time = 0;
        self.num_preemptions += 1;
    }

    /// Forget any assignment without counting a preemption
    pub(crate) fn clear_assignment(&mut self) {
        self.region = None;
        self.region_running_time = 0;
    }

    /// Accrue one tick of running time if assigned; no-op otherwise
    ///
    /// `regions` is the region table the job's [`RegionId`] indexes into.
    /// An id with no entry in `regions` is treated as unassigned. Paired
    /// placement never produces one.
    pub(crate) fn tick(&mut self, current_tick: usize, regions: &[Region]) {
        let Some(region) = self.region.and_then(|id| regions.get(id.0)) else {
            return;
        };

        self.region_running_time += 1;
        self.total_running_time += 1;
        self.history.push(JobRecord {
            tick: current_tick,
            region: region.name().to_string(),
        });
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
