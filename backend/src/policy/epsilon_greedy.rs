//! Epsilon-Greedy Policy
//!
//! Treats the region hosting the longest-resident job as the most reliable
//! one and sends new jobs there, exploring a uniformly random region with
//! probability ε.
//!
//! # Behavior
//!
//! 1. Draw `u` in [0, 1). If `u < ε`, explore: uniform random region.
//! 2. Otherwise scan every managed job in registration order and keep the
//!    region of the first job whose region running time strictly exceeds the
//!    best seen so far, starting from [`MIN_RUNNING_TIME`]. Equal running
//!    times never replace an earlier job.
//! 3. If no job exceeds the threshold, fall back to a uniform random region.

use tracing::debug;

use super::{choose_uniform, PlacementDecision, PlacementPolicy, PlacementReason, PolicyError};
use crate::models::state::SimulationState;
use crate::rng::RandomSource;

/// Exploration probability used when the policy is selected by name
pub const DEFAULT_EPSILON: f64 = 0.3;

/// A job must have run longer than this in its region to be followed
pub const MIN_RUNNING_TIME: usize = 1;

/// Exploit-the-survivor placement
///
/// # Example
///
/// ```
/// use preemption_sim_core::policy::EpsilonGreedyPolicy;
///
/// assert!(EpsilonGreedyPolicy::new(0.3).is_ok());
/// assert!(EpsilonGreedyPolicy::new(-0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedyPolicy {
    epsilon: f64,
}

impl EpsilonGreedyPolicy {
    pub fn new(epsilon: f64) -> Result<Self, PolicyError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(PolicyError::InvalidEpsilon(epsilon));
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Default for EpsilonGreedyPolicy {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl PlacementPolicy for EpsilonGreedyPolicy {
    fn select_region(
        &mut self,
        state: &SimulationState,
        rng: &mut dyn RandomSource,
    ) -> Option<PlacementDecision> {
        if rng.next_f64() < self.epsilon {
            let region = choose_uniform(state, rng)?;
            debug!(region = ?region, "exploring a random region");
            return Some(PlacementDecision {
                region,
                reason: PlacementReason::Exploration,
            });
        }

        let mut best = None;
        let mut longest = MIN_RUNNING_TIME;
        for job in state.jobs() {
            if job.region_running_time() > longest {
                if let Some(region) = job.region() {
                    best = Some((region, job));
                    longest = job.region_running_time();
                }
            }
        }

        match best {
            Some((region, job)) => {
                debug!(
                    job = job.name(),
                    region = ?region,
                    running_time = longest,
                    "following most successful job"
                );
                Some(PlacementDecision {
                    region,
                    reason: PlacementReason::Exploitation {
                        source_job: job.name().to_string(),
                        running_time: longest,
                    },
                })
            }
            None => choose_uniform(state, rng).map(|region| PlacementDecision {
                region,
                reason: PlacementReason::FallbackRandom,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "epsilon_greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::Job;
    use crate::models::region::{Region, RegionId};
    use crate::rng::ScriptedRng;

    /// Three regions; job `a` in r1, `b` in r2, `c` in r3, with the given
    /// residencies built up by ticking.
    fn state_with_residency(ticks: [usize; 3]) -> SimulationState {
        let mut state = SimulationState::new(vec![
            Region::new("r1", 0.0).unwrap(),
            Region::new("r2", 0.0).unwrap(),
            Region::new("r3", 0.0).unwrap(),
        ]);
        let max = ticks.iter().copied().max().unwrap_or(0);
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| state.add_job(Job::new(*n)))
            .collect();

        // Place each job so that it has exactly ticks[i] of residency after `max` ticks
        for t in 0..max {
            for (i, &id) in ids.iter().enumerate() {
                if max - ticks[i] == t {
                    state.place(id, RegionId(i)).unwrap();
                }
            }
            state.tick_jobs(t + 1);
        }
        state
    }

    #[test]
    fn test_exploits_longest_running_job() {
        let state = state_with_residency([2, 5, 3]);
        let mut rng = ScriptedRng::new(0.99);
        let mut policy = EpsilonGreedyPolicy::new(0.3).unwrap();

        let decision = policy.select_region(&state, &mut rng).unwrap();

        assert_eq!(decision.region, RegionId(1));
        assert_eq!(
            decision.reason,
            PlacementReason::Exploitation {
                source_job: "b".to_string(),
                running_time: 5
            }
        );
        assert_eq!(rng.choices_drawn(), 0);
    }

    #[test]
    fn test_tie_keeps_first_job() {
        let state = state_with_residency([4, 4, 4]);
        let mut rng = ScriptedRng::new(0.99);

        let decision = EpsilonGreedyPolicy::default()
            .select_region(&state, &mut rng)
            .unwrap();

        assert_eq!(decision.region, RegionId(0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Residency of exactly 1 does not qualify
        let state = state_with_residency([1, 1, 0]);
        let mut rng = ScriptedRng::new(0.99).with_choices([2]);

        let decision = EpsilonGreedyPolicy::default()
            .select_region(&state, &mut rng)
            .unwrap();

        assert_eq!(decision.region, RegionId(2));
        assert_eq!(decision.reason, PlacementReason::FallbackRandom);
    }

    #[test]
    fn test_exploration_draw() {
        let state = state_with_residency([9, 0, 0]);
        let mut rng = ScriptedRng::new(0.99).with_samples([0.29]).with_choices([2]);

        let decision = EpsilonGreedyPolicy::default()
            .select_region(&state, &mut rng)
            .unwrap();

        assert_eq!(decision.region, RegionId(2));
        assert!(decision.reason.is_exploration());
    }

    #[test]
    fn test_zero_epsilon_never_explores() {
        let state = state_with_residency([3, 0, 0]);
        let mut rng = ScriptedRng::new(0.0);

        let decision = EpsilonGreedyPolicy::new(0.0)
            .unwrap()
            .select_region(&state, &mut rng)
            .unwrap();

        assert_eq!(decision.region, RegionId(0));
        assert!(!decision.reason.is_exploration());
    }
}
