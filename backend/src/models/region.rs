//! Region model
//!
//! A region hosts jobs and evicts each of them independently with a fixed
//! per-tick probability. Membership is kept in assignment order
//! (first-assigned-first), which is also the order eviction draws are made in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::job::JobId;
use crate::rng::RandomSource;

/// Index of a region in the simulation state (registration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub usize);

/// Errors raised by region operations
#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    #[error("Region '{region}' preemption probability must be within [0, 1], got {probability}")]
    InvalidProbability { region: String, probability: f64 },

    #[error("Job {job:?} is not assigned to region '{region}'")]
    JobNotInRegion { region: String, job: JobId },
}

/// Snapshot taken on a tick where at least one job was evicted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionRecord {
    pub tick: usize,
    /// Jobs evicted this tick, in membership order
    pub evicted: Vec<String>,
    /// Jobs still running in the region after the evictions
    pub remaining: Vec<String>,
}

/// Placement target with a constant per-tick preemption probability
///
/// # Example
///
/// ```
/// use preemption_sim_core::Region;
///
/// let region = Region::new("us-east", 0.1).unwrap();
/// assert_eq!(region.name(), "us-east");
/// assert_eq!(region.preemption_probability(), 0.1);
/// assert_eq!(region.num_jobs(), 0);
///
/// assert!(Region::new("broken", 1.5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    name: String,
    preemption_probability: f64,
    jobs: Vec<JobId>,
    history: Vec<EvictionRecord>,
}

impl Region {
    /// Create an empty region
    ///
    /// Fails if `preemption_probability` is NaN or outside `[0, 1]`.
    pub fn new(name: impl Into<String>, preemption_probability: f64) -> Result<Self, RegionError> {
        let name = name.into();
        if !(0.0..=1.0).contains(&preemption_probability) {
            return Err(RegionError::InvalidProbability {
                region: name,
                probability: preemption_probability,
            });
        }

        Ok(Self {
            name,
            preemption_probability,
            jobs: Vec::new(),
            history: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preemption_probability(&self) -> f64 {
        self.preemption_probability
    }

    /// Jobs currently assigned, first-assigned-first
    pub fn jobs(&self) -> &[JobId] {
        &self.jobs
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn contains(&self, job: JobId) -> bool {
        self.jobs.contains(&job)
    }

    /// Eviction snapshots, one per tick that evicted anything
    pub fn history(&self) -> &[EvictionRecord] {
        &self.history
    }

    pub(crate) fn add_job(&mut self, job: JobId) {
        self.jobs.push(job);
    }

    /// Drop all members without touching the jobs they name
    pub(crate) fn clear_jobs(&mut self) {
        self.jobs.clear();
    }

    pub(crate) fn remove_job(&mut self, job: JobId) -> Result<(), RegionError> {
        let pos = self
            .jobs
            .iter()
            .position(|&j| j == job)
            .ok_or_else(|| RegionError::JobNotInRegion {
                region: self.name.clone(),
                job,
            })?;
        self.jobs.remove(pos);
        Ok(())
    }

    /// Draw once per member job and return the ones to evict
    ///
    /// Works on a snapshot of membership; nothing is removed here. Each job
    /// gets its own uniform draw, compared against `p` with strict less-than,
    /// so `p = 0` never evicts and `p = 1` always does.
    pub(crate) fn sample_evictions(&self, rng: &mut dyn RandomSource) -> Vec<JobId> {
        let snapshot = self.jobs.clone();
        snapshot
            .into_iter()
            .filter(|_| rng.next_f64() < self.preemption_probability)
            .collect()
    }

    pub(crate) fn record_evictions(&mut self, record: EvictionRecord) {
        self.history.push(record);
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
