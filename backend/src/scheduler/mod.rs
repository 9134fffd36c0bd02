//! Scheduler
//!
//! Places unassigned jobs into regions once per tick using a single bound
//! [`PlacementPolicy`]. The scheduler owns neither jobs nor regions: it works
//! on the [`SimulationState`] handed to it and changes assignment only through
//! the state's paired [`SimulationState::place`] operation.

use tracing::debug;

use crate::models::job::JobId;
use crate::models::region::RegionId;
use crate::models::state::{SimulationState, StateError};
use crate::policy::{PlacementPolicy, PlacementReason, PolicyConfig, PolicyError};
use crate::rng::RandomSource;

/// A placement made during a scheduling pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub tick: usize,
    pub job: JobId,
    pub region: RegionId,
    pub reason: PlacementReason,
}

/// Policy-driven scheduler
///
/// # Example
///
/// ```
/// use preemption_sim_core::{Job, Region, RngManager, Scheduler, SimulationState};
///
/// let mut state = SimulationState::new(vec![
///     Region::new("r1", 0.1).unwrap(),
///     Region::new("r2", 0.1).unwrap(),
/// ]);
/// for i in 0..4 {
///     state.add_job(Job::new(format!("job{}", i)));
/// }
///
/// let mut scheduler = Scheduler::from_name("least_loaded").unwrap();
/// let mut rng = RngManager::new(42);
/// let placements = scheduler.tick(1, &mut state, &mut rng).unwrap();
///
/// assert_eq!(placements.len(), 4);
/// assert_eq!(state.occupancy(), vec![2, 2]);
///
/// assert!(Scheduler::from_name("fastest").is_err());
/// ```
pub struct Scheduler {
    policy: Box<dyn PlacementPolicy>,
}

impl Scheduler {
    /// Build a scheduler from a validated policy configuration
    pub fn new(config: &PolicyConfig) -> Result<Self, PolicyError> {
        Ok(Self {
            policy: config.build()?,
        })
    }

    /// Build a scheduler by policy name; unknown names fail
    pub fn from_name(name: &str) -> Result<Self, PolicyError> {
        Self::new(&PolicyConfig::from_name(name)?)
    }

    /// Use a caller-supplied strategy
    pub fn with_policy(policy: Box<dyn PlacementPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Place every unassigned job, in registration order
    ///
    /// Each decision sees the placements made before it in the same pass.
    pub fn run_scheduler(
        &mut self,
        current_tick: usize,
        state: &mut SimulationState,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<Placement>, StateError> {
        let mut placements = Vec::new();

        for job in state.unassigned_jobs() {
            let Some(decision) = self.policy.select_region(state, rng) else {
                // No regions to place into
                break;
            };

            state.place(job, decision.region)?;
            debug!(
                tick = current_tick,
                job = state.job(job).map(|j| j.name()).unwrap_or_default(),
                region = state.region(decision.region).map(|r| r.name()).unwrap_or_default(),
                reason = ?decision.reason,
                "scheduled job"
            );

            placements.push(Placement {
                tick: current_tick,
                job,
                region: decision.region,
                reason: decision.reason,
            });
        }

        Ok(placements)
    }

    /// One scheduler tick
    pub fn tick(
        &mut self,
        current_tick: usize,
        state: &mut SimulationState,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<Placement>, StateError> {
        self.run_scheduler(current_tick, state, rng)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("policy", &self.policy.name())
            .finish()
    }
}
