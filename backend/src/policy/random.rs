//! Random Policy
//!
//! Baseline: pick any region uniformly, ignoring all state.

use super::{choose_uniform, PlacementDecision, PlacementPolicy, PlacementReason};
use crate::models::state::SimulationState;
use crate::rng::RandomSource;

/// Uniform random placement
///
/// # Example
///
/// ```
/// use preemption_sim_core::policy::{PlacementPolicy, RandomPolicy};
/// use preemption_sim_core::{Region, ScriptedRng, SimulationState, RegionId};
///
/// let state = SimulationState::new(vec![
///     Region::new("r1", 0.1).unwrap(),
///     Region::new("r2", 0.1).unwrap(),
/// ]);
/// let mut rng = ScriptedRng::new(0.5).with_choices([1]);
///
/// let decision = RandomPolicy::new().select_region(&state, &mut rng).unwrap();
/// assert_eq!(decision.region, RegionId(1));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementPolicy for RandomPolicy {
    fn select_region(
        &mut self,
        state: &SimulationState,
        rng: &mut dyn RandomSource,
    ) -> Option<PlacementDecision> {
        choose_uniform(state, rng).map(|region| PlacementDecision {
            region,
            reason: PlacementReason::Random,
        })
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
