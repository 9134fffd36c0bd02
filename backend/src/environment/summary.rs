//! Run summary
//!
//! Aggregates uptime, preemption and occupancy figures from the current
//! state into a serializable report.

use serde::{Deserialize, Serialize};

use crate::models::state::SimulationState;

/// Per-job totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    pub total_running_time: usize,
    pub num_preemptions: usize,
    pub current_region: Option<String>,
    /// Fraction of elapsed ticks spent running
    pub uptime_ratio: f64,
}

/// Per-region totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub preemption_probability: f64,
    /// Jobs assigned right now
    pub occupancy: usize,
    /// Job-ticks served by this region
    pub job_ticks: usize,
    /// Ticks on which at least one job was evicted
    pub eviction_ticks: usize,
    pub total_evictions: usize,
}

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub policy_name: String,
    pub ticks: usize,
    pub jobs: Vec<JobSummary>,
    pub regions: Vec<RegionSummary>,
    pub total_running_time: usize,
    pub total_preemptions: usize,
    /// Running job-ticks over available job-ticks
    pub uptime_ratio: f64,
}

impl SimulationSummary {
    pub(crate) fn collect(ticks: usize, policy_name: &str, state: &SimulationState) -> Self {
        let ratio = |running: usize, available: usize| {
            if available == 0 {
                0.0
            } else {
                running as f64 / available as f64
            }
        };

        let jobs: Vec<JobSummary> = state
            .jobs()
            .iter()
            .map(|job| JobSummary {
                name: job.name().to_string(),
                total_running_time: job.total_running_time(),
                num_preemptions: job.num_preemptions(),
                current_region: job
                    .region()
                    .and_then(|id| state.region(id))
                    .map(|r| r.name().to_string()),
                uptime_ratio: ratio(job.total_running_time(), ticks),
            })
            .collect();

        let regions = state
            .regions()
            .iter()
            .map(|region| RegionSummary {
                name: region.name().to_string(),
                preemption_probability: region.preemption_probability(),
                occupancy: region.num_jobs(),
                job_ticks: state
                    .jobs()
                    .iter()
                    .flat_map(|j| j.history())
                    .filter(|rec| rec.region == region.name())
                    .count(),
                eviction_ticks: region.history().len(),
                total_evictions: region.history().iter().map(|h| h.evicted.len()).sum(),
            })
            .collect();

        let total_running_time = jobs.iter().map(|j| j.total_running_time).sum();
        let total_preemptions = jobs.iter().map(|j| j.num_preemptions).sum();

        Self {
            policy_name: policy_name.to_string(),
            ticks,
            uptime_ratio: ratio(total_running_time, ticks * jobs.len()),
            jobs,
            regions,
            total_running_time,
            total_preemptions,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
