//! Event logging for simulation replay and auditing.
//!
//! Every assignment change is captured as an [`Event`] carrying the tick it
//! happened on. The log is the observable record of the run:
//! - **JobPlaced**: the scheduler moved an unassigned job into a region
//! - **Exploration**: an epsilon-greedy decision fell back to a random region
//! - **JobPreempted**: a region evicted a job
//!
//! Events are logged in the order they occur within a tick: placements
//! first, then evictions region by region.
//!
//! # Example
//!
//! ```rust
//! use preemption_sim_core::models::Event;
//! use preemption_sim_core::policy::PlacementReason;
//!
//! let event = Event::JobPlaced {
//!     tick: 10,
//!     job: "job3".to_string(),
//!     region: "r1".to_string(),
//!     reason: PlacementReason::LeastLoaded,
//! };
//!
//! assert_eq!(event.tick(), 10);
//! assert_eq!(event.event_type(), "JobPlaced");
//! ```

use serde::{Deserialize, Serialize};

use crate::policy::PlacementReason;

/// Simulation event capturing an assignment change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Unassigned job placed into a region
    JobPlaced {
        tick: usize,
        job: String,
        region: String,
        reason: PlacementReason,
    },

    /// Epsilon-greedy explored instead of exploiting
    ///
    /// Always followed by the matching `JobPlaced` event.
    Exploration {
        tick: usize,
        job: String,
        region: String,
    },

    /// Region evicted a job
    JobPreempted {
        tick: usize,
        job: String,
        region: String,
        /// Ticks the job had been resident before eviction
        ran_for: usize,
    },
}

impl Event {
    pub fn tick(&self) -> usize {
        match self {
            Event::JobPlaced { tick, .. }
            | Event::Exploration { tick, .. }
            | Event::JobPreempted { tick, .. } => *tick,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::JobPlaced { .. } => "JobPlaced",
            Event::Exploration { .. } => "Exploration",
            Event::JobPreempted { .. } => "JobPreempted",
        }
    }

    pub fn job(&self) -> &str {
        match self {
            Event::JobPlaced { job, .. }
            | Event::Exploration { job, .. }
            | Event::JobPreempted { job, .. } => job,
        }
    }

    pub fn region(&self) -> &str {
        match self {
            Event::JobPlaced { region, .. }
            | Event::Exploration { region, .. }
            | Event::JobPreempted { region, .. } => region,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type (e.g. `"JobPreempted"`)
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_job(&self, job: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.job() == job).collect()
    }

    pub fn events_for_region(&self, region: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.region() == region).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.log(Event::Exploration {
            tick: 1,
            job: "job0".to_string(),
            region: "r2".to_string(),
        });
        log.log(Event::JobPlaced {
            tick: 1,
            job: "job0".to_string(),
            region: "r2".to_string(),
            reason: PlacementReason::Exploration,
        });
        log.log(Event::JobPlaced {
            tick: 1,
            job: "job1".to_string(),
            region: "r1".to_string(),
            reason: PlacementReason::FallbackRandom,
        });
        log.log(Event::JobPreempted {
            tick: 2,
            job: "job0".to_string(),
            region: "r2".to_string(),
            ran_for: 2,
        });
        log
    }

    #[test]
    fn test_filters() {
        let log = sample_log();

        assert_eq!(log.len(), 4);
        assert_eq!(log.events_at_tick(1).len(), 3);
        assert_eq!(log.events_of_type("JobPlaced").len(), 2);
        assert_eq!(log.events_of_type("JobPreempted").len(), 1);
        assert_eq!(log.events_for_job("job0").len(), 3);
        assert_eq!(log.events_for_region("r1").len(), 1);
    }

    #[test]
    fn test_empty_log() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert!(log.events_at_tick(0).is_empty());
    }
}
