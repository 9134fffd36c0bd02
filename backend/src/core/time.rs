//! Time management for the simulation
//!
//! The simulation operates in discrete ticks. The clock starts at 0 and every
//! call to [`Clock::advance_tick`] moves it forward by exactly one. There is
//! no process-wide time: the current tick is read from the clock and passed
//! explicitly into every tick-related call.

use serde::{Deserialize, Serialize};

/// Monotonic tick counter owned by the environment
///
/// # Example
/// ```
/// use preemption_sim_core::Clock;
///
/// let mut clock = Clock::new();
/// assert_eq!(clock.current_tick(), 0);
///
/// let now = clock.advance_tick();
/// assert_eq!(now, 1);
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    /// Total ticks elapsed since simulation start
    current_tick: usize,
}

impl Clock {
    /// Create a clock at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Advance time by one tick and return the new tick
    ///
    /// # Example
    /// ```
    /// use preemption_sim_core::Clock;
    ///
    /// let mut clock = Clock::new();
    /// clock.advance_tick();
    /// clock.advance_tick();
    /// assert_eq!(clock.current_tick(), 2);
    /// ```
    pub fn advance_tick(&mut self) -> usize {
        self.current_tick += 1;
        self.current_tick
    }

    /// Get the current tick (total ticks since start)
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }
}
