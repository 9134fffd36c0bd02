//! Least-Loaded Policy
//!
//! Picks the region with the fewest assigned jobs. Ties go to the region
//! registered first. Makes no random draws, so its choices are fully
//! determined by current occupancy.

use super::{PlacementDecision, PlacementPolicy, PlacementReason};
use crate::models::region::RegionId;
use crate::models::state::SimulationState;
use crate::rng::RandomSource;

/// Fewest-jobs placement
#[derive(Debug, Default, Clone, Copy)]
pub struct LeastLoadedPolicy;

impl LeastLoadedPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementPolicy for LeastLoadedPolicy {
    fn select_region(
        &mut self,
        state: &SimulationState,
        _rng: &mut dyn RandomSource,
    ) -> Option<PlacementDecision> {
        // min_by_key keeps the first of several equal minimums
        state
            .regions()
            .iter()
            .enumerate()
            .min_by_key(|(_, region)| region.num_jobs())
            .map(|(idx, _)| PlacementDecision {
                region: RegionId(idx),
                reason: PlacementReason::LeastLoaded,
            })
    }

    fn name(&self) -> &'static str {
        "least_loaded"
    }
}
