//! Simulation State
//!
//! Arena holding every job and region of a run, indexed by [`JobId`] and
//! [`RegionId`] in registration order.
//!
//! # Critical Invariants
//!
//! 1. **Bidirectional assignment**: a job appears in at most one region's
//!    membership, and that region is exactly `job.region()`.
//! 2. **Paired updates**: assignment only changes through [`SimulationState::place`]
//!    and [`SimulationState::evict`], which update both sides together.
//! 3. **Stable identity**: jobs and regions are never removed, so ids stay valid
//!    for the whole run.

use thiserror::Error;
use tracing::debug;

use crate::models::job::{Job, JobId};
use crate::models::region::{EvictionRecord, Region, RegionError, RegionId};
use crate::rng::RandomSource;

/// Errors from paired assignment operations
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("Job not found: {0:?}")]
    JobNotFound(JobId),

    #[error("Region not found: {0:?}")]
    RegionNotFound(RegionId),

    #[error("Job '{job}' is already assigned to region '{region}'")]
    AlreadyAssigned { job: String, region: String },

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error("Assignment invariant violated: {0}")]
    Inconsistent(String),
}

/// A single eviction carried out by a region tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub job: JobId,
    pub region: RegionId,
    /// Residency the job lost
    pub ran_for: usize,
}

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use preemption_sim_core::{Job, Region, SimulationState};
///
/// let mut state = SimulationState::new(vec![Region::new("r1", 0.1).unwrap()]);
/// let job = state.add_job(Job::new("job0"));
/// let r1 = state.find_region("r1").unwrap();
///
/// state.place(job, r1).unwrap();
/// assert_eq!(state.job(job).unwrap().region(), Some(r1));
/// assert!(state.region(r1).unwrap().contains(job));
///
/// state.evict(r1, job).unwrap();
/// assert_eq!(state.job(job).unwrap().num_preemptions(), 1);
/// assert!(state.check_consistency().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    jobs: Vec<Job>,
    regions: Vec<Region>,
}

impl SimulationState {
    /// Create a state with the given regions and no jobs
    ///
    /// Regions start empty; membership they carry in is dropped, since no job
    /// in this state points back at it. Eviction history is kept.
    pub fn new(mut regions: Vec<Region>) -> Self {
        for region in &mut regions {
            region.clear_jobs();
        }
        Self {
            jobs: Vec::new(),
            regions,
        }
    }

    /// Register a job and return its id
    ///
    /// Any assignment the job carries is dropped; use [`SimulationState::place`]
    /// to give it an initial region.
    pub fn add_job(&mut self, mut job: Job) -> JobId {
        job.clear_assignment();
        let id = JobId(self.jobs.len());
        self.jobs.push(job);
        id
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(id.0)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Job ids in registration order
    pub fn job_ids(&self) -> impl Iterator<Item = JobId> {
        (0..self.jobs.len()).map(JobId)
    }

    /// Region ids in registration order
    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> {
        (0..self.regions.len()).map(RegionId)
    }

    pub fn find_job(&self, name: &str) -> Option<JobId> {
        self.jobs.iter().position(|j| j.name() == name).map(JobId)
    }

    pub fn find_region(&self, name: &str) -> Option<RegionId> {
        self.regions
            .iter()
            .position(|r| r.name() == name)
            .map(RegionId)
    }

    /// Jobs currently assigned to each region, in region order
    pub fn occupancy(&self) -> Vec<usize> {
        self.regions.iter().map(Region::num_jobs).collect()
    }

    /// Jobs waiting for placement, in registration order
    pub fn unassigned_jobs(&self) -> Vec<JobId> {
        self.job_ids()
            .filter(|id| !self.jobs[id.0].is_assigned())
            .collect()
    }

    // ========================================================================
    // Paired Operations
    // ========================================================================

    /// Assign an unassigned job to a region (both sides at once)
    pub fn place(&mut self, job: JobId, region: RegionId) -> Result<(), StateError> {
        if region.0 >= self.regions.len() {
            return Err(StateError::RegionNotFound(region));
        }
        let current = self.jobs.get(job.0).ok_or(StateError::JobNotFound(job))?;
        if let Some(existing) = current.region() {
            return Err(StateError::AlreadyAssigned {
                job: current.name().to_string(),
                region: self.regions[existing.0].name().to_string(),
            });
        }

        self.jobs[job.0].assign(region);
        self.regions[region.0].add_job(job);
        Ok(())
    }

    /// Evict a job from a region (both sides at once)
    ///
    /// Fails with [`RegionError::JobNotInRegion`] if the job is not a member;
    /// that is an internal consistency bug, never a normal outcome.
    pub fn evict(&mut self, region: RegionId, job: JobId) -> Result<Eviction, StateError> {
        if job.0 >= self.jobs.len() {
            return Err(StateError::JobNotFound(job));
        }
        self.regions
            .get_mut(region.0)
            .ok_or(StateError::RegionNotFound(region))?
            .remove_job(job)?;

        let target = &mut self.jobs[job.0];
        let ran_for = target.region_running_time();
        target.preempt();

        Ok(Eviction {
            job,
            region,
            ran_for,
        })
    }

    // ========================================================================
    // Tick Steps
    // ========================================================================

    /// Accrue running time for every job, in registration order
    pub fn tick_jobs(&mut self, current_tick: usize) {
        let regions = &self.regions;
        for job in &mut self.jobs {
            job.tick(current_tick, regions);
        }
    }

    /// Run one region's eviction draws and apply them
    ///
    /// Draws are made against a membership snapshot; removals go to the live
    /// set afterwards. A history entry is recorded only if something was
    /// evicted.
    pub fn tick_region(
        &mut self,
        region: RegionId,
        current_tick: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<Eviction>, StateError> {
        let doomed = self
            .regions
            .get(region.0)
            .ok_or(StateError::RegionNotFound(region))?
            .sample_evictions(rng);

        if doomed.is_empty() {
            return Ok(Vec::new());
        }

        let evictions = doomed
            .into_iter()
            .map(|job| self.evict(region, job))
            .collect::<Result<Vec<_>, _>>()?;

        let evicted = evictions
            .iter()
            .map(|e| self.jobs[e.job.0].name().to_string())
            .collect();
        let remaining = self.regions[region.0]
            .jobs()
            .iter()
            .map(|id| self.jobs[id.0].name().to_string())
            .collect();

        let target = &mut self.regions[region.0];
        debug!(
            tick = current_tick,
            region = target.name(),
            evicted = evictions.len(),
            "region evicted jobs"
        );
        target.record_evictions(EvictionRecord {
            tick: current_tick,
            evicted,
            remaining,
        });

        Ok(evictions)
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Verify job/region cross-references agree in both directions
    pub fn check_consistency(&self) -> Result<(), StateError> {
        let mut seen = vec![None; self.jobs.len()];

        for (r_idx, region) in self.regions.iter().enumerate() {
            for &job in region.jobs() {
                let slot = seen.get_mut(job.0).ok_or(StateError::JobNotFound(job))?;
                if let Some(other) = *slot {
                    return Err(StateError::Inconsistent(format!(
                        "job {:?} is a member of regions {} and {}",
                        job, other, r_idx
                    )));
                }
                *slot = Some(r_idx);
            }
        }

        for (j_idx, job) in self.jobs.iter().enumerate() {
            let claimed = job.region().map(|r| r.0);
            if claimed != seen[j_idx] {
                return Err(StateError::Inconsistent(format!(
                    "job '{}' points at {:?} but is a member of {:?}",
                    job.name(),
                    claimed,
                    seen[j_idx]
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn two_region_state() -> SimulationState {
        SimulationState::new(vec![
            Region::new("r1", 0.5).unwrap(),
            Region::new("r2", 0.5).unwrap(),
        ])
    }

    #[test]
    fn test_place_twice_rejected() {
        let mut state = two_region_state();
        let job = state.add_job(Job::new("job0"));

        state.place(job, RegionId(0)).unwrap();
        let err = state.place(job, RegionId(1)).unwrap_err();

        assert_eq!(
            err,
            StateError::AlreadyAssigned {
                job: "job0".to_string(),
                region: "r1".to_string()
            }
        );
        assert_eq!(state.occupancy(), vec![1, 0]);
    }

    #[test]
    fn test_place_unknown_ids() {
        let mut state = two_region_state();
        let job = state.add_job(Job::new("job0"));

        assert_eq!(
            state.place(job, RegionId(9)),
            Err(StateError::RegionNotFound(RegionId(9)))
        );
        assert_eq!(
            state.place(JobId(4), RegionId(0)),
            Err(StateError::JobNotFound(JobId(4)))
        );
    }

    #[test]
    fn test_evict_from_wrong_region_is_error() {
        let mut state = two_region_state();
        let job = state.add_job(Job::new("job0"));
        state.place(job, RegionId(0)).unwrap();

        let err = state.evict(RegionId(1), job).unwrap_err();
        assert!(matches!(
            err,
            StateError::Region(RegionError::JobNotInRegion { .. })
        ));
        // Nothing changed
        assert_eq!(state.job(job).unwrap().region(), Some(RegionId(0)));
        assert_eq!(state.job(job).unwrap().num_preemptions(), 0);
    }

    #[test]
    fn test_tick_region_records_history_only_on_eviction() {
        let mut state = two_region_state();
        let a = state.add_job(Job::new("a"));
        let b = state.add_job(Job::new("b"));
        let c = state.add_job(Job::new("c"));
        for job in [a, b, c] {
            state.place(job, RegionId(0)).unwrap();
        }
        state.tick_jobs(1);

        // No evictions: all draws above p
        let mut calm = ScriptedRng::new(0.9);
        assert!(state.tick_region(RegionId(0), 1, &mut calm).unwrap().is_empty());
        assert!(state.region(RegionId(0)).unwrap().history().is_empty());

        // Evict a and c, b survives
        let mut rng = ScriptedRng::new(0.9).with_samples([0.1, 0.8, 0.2]);
        let evictions = state.tick_region(RegionId(0), 2, &mut rng).unwrap();

        assert_eq!(evictions.len(), 2);
        assert_eq!(evictions[0].ran_for, 1);
        let history = state.region(RegionId(0)).unwrap().history();
        assert_eq!(
            history,
            &[EvictionRecord {
                tick: 2,
                evicted: vec!["a".to_string(), "c".to_string()],
                remaining: vec!["b".to_string()],
            }]
        );
        assert_eq!(state.unassigned_jobs(), vec![a, c]);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_add_job_drops_stray_assignment() {
        let mut state = two_region_state();
        let mut job = Job::new("job0");
        job.assign(RegionId(1));

        let id = state.add_job(job);
        assert!(!state.job(id).unwrap().is_assigned());
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_new_drops_stray_region_membership() {
        let mut source = two_region_state();
        let placed = source.add_job(Job::new("placed"));
        source.place(placed, RegionId(0)).unwrap();
        let carried = source.region(RegionId(0)).unwrap().clone();
        assert_eq!(carried.num_jobs(), 1);

        let mut state = SimulationState::new(vec![carried, Region::new("r2", 1.0).unwrap()]);
        assert_eq!(state.region(RegionId(0)).unwrap().num_jobs(), 0);

        let fresh = state.add_job(Job::new("fresh"));
        assert!(state.check_consistency().is_ok());

        let mut rng = ScriptedRng::new(0.0);
        let evictions = state.tick_region(RegionId(0), 1, &mut rng).unwrap();
        assert!(evictions.is_empty());
        assert_eq!(state.job(fresh).unwrap().num_preemptions(), 0);
    }

    #[test]
    fn test_find_by_name() {
        let mut state = two_region_state();
        state.add_job(Job::new("job0"));
        let j1 = state.add_job(Job::new("job1"));

        assert_eq!(state.find_job("job1"), Some(j1));
        assert_eq!(state.find_region("r2"), Some(RegionId(1)));
        assert_eq!(state.find_region("r3"), None);
    }
}
