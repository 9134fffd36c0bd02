//! Placement Policy Module
//!
//! This module defines the policy interface the scheduler uses to pick a
//! region for each unassigned job.
//!
//! # Overview
//!
//! Every tick the scheduler walks the unassigned jobs in registration order
//! and asks its policy for a target region. The policy sees the accumulated
//! job and region state plus a random source, and nothing else: it never
//! reads the clock, so time only matters through accumulated running time.
//!
//! # Policy Interface
//!
//! All policies implement the `PlacementPolicy` trait:
//! ```rust
//! use preemption_sim_core::policy::{PlacementDecision, PlacementPolicy, PlacementReason};
//! use preemption_sim_core::{RandomSource, RegionId, SimulationState};
//!
//! struct AlwaysFirst;
//!
//! impl PlacementPolicy for AlwaysFirst {
//!     fn select_region(
//!         &mut self,
//!         state: &SimulationState,
//!         _rng: &mut dyn RandomSource,
//!     ) -> Option<PlacementDecision> {
//!         (state.num_regions() > 0).then(|| PlacementDecision {
//!             region: RegionId(0),
//!             reason: PlacementReason::LeastLoaded,
//!         })
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "always_first"
//!     }
//! }
//! ```
//!
//! # Available Policies
//!
//! The set is closed; [`PolicyConfig::from_name`] accepts exactly these names:
//! 1. **random**: uniform over all regions
//! 2. **least_loaded**: fewest current jobs, ties to the earliest region
//! 3. **epsilon_greedy**: explore with probability ε, otherwise follow the
//!    job with the longest current residency

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::region::RegionId;
use crate::models::state::SimulationState;
use crate::rng::RandomSource;

mod epsilon_greedy;
mod least_loaded;
mod random;

pub use epsilon_greedy::{EpsilonGreedyPolicy, DEFAULT_EPSILON, MIN_RUNNING_TIME};
pub use least_loaded::LeastLoadedPolicy;
pub use random::RandomPolicy;

/// Errors raised while resolving a policy configuration
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("Unknown policy: {0} (expected one of: random, least_loaded, epsilon_greedy)")]
    UnknownPolicy(String),

    #[error("Epsilon must be within [0, 1], got {0}")]
    InvalidEpsilon(f64),
}

/// Why a region was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementReason {
    /// Uniform random choice (random policy)
    Random,

    /// Fewest jobs at decision time
    LeastLoaded,

    /// Epsilon-greedy exploration draw
    Exploration,

    /// Epsilon-greedy followed the longest-running job's region
    Exploitation {
        source_job: String,
        running_time: usize,
    },

    /// Epsilon-greedy found no job past the threshold and chose at random
    FallbackRandom,
}

impl PlacementReason {
    pub fn is_exploration(&self) -> bool {
        matches!(self, PlacementReason::Exploration)
    }
}

/// Region chosen for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    pub region: RegionId,
    pub reason: PlacementReason,
}

/// Placement policy trait
///
/// Called once per unassigned job per tick. Returns `None` only when there
/// is no region to choose from.
pub trait PlacementPolicy: Send {
    /// Pick a region for the next unassigned job
    ///
    /// `state` reflects every placement already made earlier in the same
    /// scheduling pass.
    fn select_region(
        &mut self,
        state: &SimulationState,
        rng: &mut dyn RandomSource,
    ) -> Option<PlacementDecision>;

    /// Policy name as accepted by [`PolicyConfig::from_name`]
    fn name(&self) -> &'static str;
}

/// Policy selection
///
/// Validated once and turned into a single strategy object by
/// [`PolicyConfig::build`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum PolicyConfig {
    /// Uniform random region
    #[default]
    Random,

    /// Fewest assigned jobs
    LeastLoaded,

    /// Exploit the longest-running job's region, explore with probability `epsilon`
    EpsilonGreedy {
        /// Exploration probability in [0, 1]
        epsilon: f64,
    },
}

impl PolicyConfig {
    /// Resolve a policy by name
    ///
    /// `epsilon_greedy` gets [`DEFAULT_EPSILON`]. Unknown names are an error;
    /// there is no fallback policy.
    ///
    /// # Example
    ///
    /// ```
    /// use preemption_sim_core::policy::{PolicyConfig, PolicyError};
    ///
    /// assert_eq!(PolicyConfig::from_name("least_loaded"), Ok(PolicyConfig::LeastLoaded));
    /// assert_eq!(
    ///     PolicyConfig::from_name("round_robin"),
    ///     Err(PolicyError::UnknownPolicy("round_robin".to_string()))
    /// );
    /// ```
    pub fn from_name(name: &str) -> Result<Self, PolicyError> {
        match name {
            "random" => Ok(PolicyConfig::Random),
            "least_loaded" => Ok(PolicyConfig::LeastLoaded),
            "epsilon_greedy" => Ok(PolicyConfig::EpsilonGreedy {
                epsilon: DEFAULT_EPSILON,
            }),
            other => Err(PolicyError::UnknownPolicy(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PolicyConfig::Random => "random",
            PolicyConfig::LeastLoaded => "least_loaded",
            PolicyConfig::EpsilonGreedy { .. } => "epsilon_greedy",
        }
    }

    /// Check parameters without building
    pub fn validate(&self) -> Result<(), PolicyError> {
        if let PolicyConfig::EpsilonGreedy { epsilon } = self {
            if !(0.0..=1.0).contains(epsilon) {
                return Err(PolicyError::InvalidEpsilon(*epsilon));
            }
        }
        Ok(())
    }

    /// Build the strategy object for this configuration
    pub fn build(&self) -> Result<Box<dyn PlacementPolicy>, PolicyError> {
        self.validate()?;
        let policy: Box<dyn PlacementPolicy> = match self {
            PolicyConfig::Random => Box::new(RandomPolicy::new()),
            PolicyConfig::LeastLoaded => Box::new(LeastLoadedPolicy::new()),
            PolicyConfig::EpsilonGreedy { epsilon } => {
                Box::new(EpsilonGreedyPolicy::new(*epsilon)?)
            }
        };
        Ok(policy)
    }
}

impl std::str::FromStr for PolicyConfig {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Uniform choice over all regions, `None` if there are none
pub(crate) fn choose_uniform(
    state: &SimulationState,
    rng: &mut dyn RandomSource,
) -> Option<RegionId> {
    match state.num_regions() {
        0 => None,
        n => Some(RegionId(rng.choose_index(n))),
    }
}
