//! Environment Engine
//!
//! Main simulation loop coupling jobs, regions, the scheduler and the clock.
//!
//! # Architecture
//!
//! ```text
//! For each tick t:
//! 1. Advance the clock (t = t + 1)
//! 2. Scheduler places every unassigned job
//! 3. Every job accrues running time, in registration order
//! 4. Every region draws evictions, in registration order
//! 5. Log events
//! ```
//!
//! Placement, accrual and eviction all happen inside one tick, so a job can be
//! placed and evicted within its very first tick.
//!
//! # Example
//!
//! ```rust
//! use preemption_sim_core::environment::{Environment, EnvironmentConfig};
//! use preemption_sim_core::policy::PolicyConfig;
//!
//! let config = EnvironmentConfig::new(PolicyConfig::Random)
//!     .with_seed(7)
//!     .with_region("r1", 0.1)
//!     .with_region("r2", 0.1)
//!     .with_jobs((0..10).map(|i| format!("job{}", i)));
//!
//! let mut env = Environment::new(config).unwrap();
//! for _ in 0..100 {
//!     env.tick().unwrap();
//! }
//! assert_eq!(env.current_tick(), 100);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::time::Clock;
use crate::environment::summary::SimulationSummary;
use crate::models::event::{Event, EventLog};
use crate::models::job::{Job, JobId};
use crate::models::region::{Region, RegionError, RegionId};
use crate::models::state::{SimulationState, StateError};
use crate::policy::{PolicyConfig, PolicyError};
use crate::rng::{RandomSource, RngManager};
use crate::scheduler::Scheduler;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete environment configuration
///
/// # Fields
///
/// * `rng_seed` - Seed for the deterministic random source
/// * `regions` - Placement targets, in registration order
/// * `jobs` - Jobs to manage, in registration order
/// * `policy` - Placement policy used by the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    pub regions: Vec<RegionConfig>,

    pub jobs: Vec<JobConfig>,

    pub policy: PolicyConfig,
}

/// Per-region configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Unique region name
    pub name: String,

    /// Per-tick eviction probability for each hosted job, in [0, 1]
    pub preemption_probability: f64,
}

/// Per-job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Unique job name
    pub name: String,

    /// Region to start in (None = wait for the scheduler)
    pub initial_region: Option<String>,
}

impl EnvironmentConfig {
    /// Empty configuration with seed 0
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            rng_seed: 0,
            regions: Vec::new(),
            jobs: Vec::new(),
            policy,
        }
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_region(mut self, name: impl Into<String>, preemption_probability: f64) -> Self {
        self.regions.push(RegionConfig {
            name: name.into(),
            preemption_probability,
        });
        self
    }

    /// Add an unassigned job
    pub fn with_job(mut self, name: impl Into<String>) -> Self {
        self.jobs.push(JobConfig {
            name: name.into(),
            initial_region: None,
        });
        self
    }

    /// Add a job that starts in `region`
    pub fn with_job_in(mut self, name: impl Into<String>, region: impl Into<String>) -> Self {
        self.jobs.push(JobConfig {
            name: name.into(),
            initial_region: Some(region.into()),
        });
        self
    }

    pub fn with_jobs<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        names.into_iter().fold(self, |config, name| config.with_job(name))
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Top-level simulation driver
///
/// # Determinism
///
/// All randomness goes through one [`RandomSource`]. With the default
/// [`RngManager`], same seed + same config = identical histories.
pub struct Environment {
    clock: Clock,

    /// Jobs and regions
    state: SimulationState,

    scheduler: Scheduler,

    rng: Box<dyn RandomSource>,

    /// Event log (placements, explorations, preemptions)
    event_log: EventLog,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Tick number (clock value after advancing)
    pub tick: usize,

    /// Jobs placed by the scheduler this tick
    pub num_placements: usize,

    /// Placements that came from an exploration draw
    pub num_explorations: usize,

    /// Jobs evicted this tick across all regions
    pub num_preemptions: usize,

    /// Jobs per region at the end of the tick, in region order
    pub occupancy: Vec<usize>,
}

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Region error: {0}")]
    Region(#[from] RegionError),

    /// Job/region cross-reference violated; an internal bug
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl Environment {
    /// Create a new environment seeded from `config.rng_seed`
    ///
    /// Everything is validated here, before any tick runs.
    pub fn new(config: EnvironmentConfig) -> Result<Self, SimulationError> {
        let rng = Box::new(RngManager::new(config.rng_seed));
        Self::with_rng(config, rng)
    }

    /// Create a new environment driven by a caller-supplied random source
    ///
    /// `config.rng_seed` is ignored.
    pub fn with_rng(
        config: EnvironmentConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let scheduler = Scheduler::new(&config.policy)?;

        let regions = config
            .regions
            .iter()
            .map(|rc| Region::new(rc.name.clone(), rc.preemption_probability))
            .collect::<Result<Vec<_>, _>>()?;
        let mut state = SimulationState::new(regions);

        for job_config in &config.jobs {
            let job = state.add_job(Job::new(job_config.name.clone()));
            if let Some(region_name) = &job_config.initial_region {
                let region = state.find_region(region_name).ok_or_else(|| {
                    SimulationError::InvalidConfig(format!(
                        "Job '{}' starts in unknown region '{}'",
                        job_config.name, region_name
                    ))
                })?;
                state.place(job, region)?;
            }
        }

        info!(
            regions = state.num_regions(),
            jobs = state.num_jobs(),
            policy = scheduler.policy_name(),
            "environment ready"
        );

        Ok(Self {
            clock: Clock::new(),
            state,
            scheduler,
            rng,
            event_log: EventLog::new(),
        })
    }

    /// Validate configuration
    fn validate_config(config: &EnvironmentConfig) -> Result<(), SimulationError> {
        config.policy.validate()?;

        if config.regions.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one region".to_string(),
            ));
        }

        let mut names = std::collections::HashSet::new();
        for region in &config.regions {
            if !names.insert(region.name.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate region name: {}",
                    region.name
                )));
            }
            if !(0.0..=1.0).contains(&region.preemption_probability) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Region '{}' preemption probability must be within [0, 1], got {}",
                    region.name, region.preemption_probability
                )));
            }
        }

        let mut names = std::collections::HashSet::new();
        for job in &config.jobs {
            if !names.insert(job.name.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate job name: {}",
                    job.name
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get current tick number
    pub fn current_tick(&self) -> usize {
        self.clock.current_tick()
    }

    /// Get reference to simulation state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// All jobs, in registration order
    pub fn jobs(&self) -> &[Job] {
        self.state.jobs()
    }

    /// All regions, in registration order
    pub fn regions(&self) -> &[Region] {
        self.state.regions()
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.state.find_job(name).and_then(|id| self.state.job(id))
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.state.find_region(name).and_then(|id| self.state.region(id))
    }

    pub fn policy_name(&self) -> &'static str {
        self.scheduler.policy_name()
    }

    /// Get reference to event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Per-job and per-region totals so far
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::collect(self.current_tick(), self.policy_name(), &self.state)
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    ///
    /// # Returns
    ///
    /// * `Ok(TickResult)` - Tick executed successfully
    /// * `Err(SimulationError)` - Job/region bookkeeping went out of sync
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        // STEP 1: CLOCK
        let tick = self.clock.advance_tick();

        // STEP 2: SCHEDULING
        let placements = self
            .scheduler
            .tick(tick, &mut self.state, self.rng.as_mut())?;

        let mut num_explorations = 0;
        for placement in &placements {
            let job = self.job_name(placement.job);
            let region = self.region_name(placement.region);
            if placement.reason.is_exploration() {
                num_explorations += 1;
                self.event_log.log(Event::Exploration {
                    tick,
                    job: job.clone(),
                    region: region.clone(),
                });
            }
            self.event_log.log(Event::JobPlaced {
                tick,
                job,
                region,
                reason: placement.reason.clone(),
            });
        }

        // STEP 3: ACCRUAL
        self.state.tick_jobs(tick);

        // STEP 4: EVICTION
        let region_ids: Vec<RegionId> = self.state.region_ids().collect();
        let mut num_preemptions = 0;
        for region_id in region_ids {
            let evictions = self
                .state
                .tick_region(region_id, tick, self.rng.as_mut())?;
            num_preemptions += evictions.len();

            for eviction in evictions {
                let event = Event::JobPreempted {
                    tick,
                    job: self.job_name(eviction.job),
                    region: self.region_name(eviction.region),
                    ran_for: eviction.ran_for,
                };
                self.event_log.log(event);
            }
        }

        debug_assert!(self.state.check_consistency().is_ok());

        Ok(TickResult {
            tick,
            num_placements: placements.len(),
            num_explorations,
            num_preemptions,
            occupancy: self.state.occupancy(),
        })
    }

    /// Run `ticks` ticks and collect their results
    pub fn run(&mut self, ticks: usize) -> Result<Vec<TickResult>, SimulationError> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    fn job_name(&self, id: JobId) -> String {
        self.state
            .job(id)
            .map(|j| j.name().to_string())
            .unwrap_or_default()
    }

    fn region_name(&self, id: RegionId) -> String {
        self.state
            .region(id)
            .map(|r| r.name().to_string())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("clock", &self.clock)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("events", &self.event_log.len())
            .finish()
    }
}
