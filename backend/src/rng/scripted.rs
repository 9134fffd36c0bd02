//! Scripted random source
//!
//! Replays fixed sequences of draws. Lets hosts and tests pin down exactly
//! which jobs get evicted and which regions a policy picks.

use std::collections::VecDeque;

use super::RandomSource;

/// [`RandomSource`] that replays queued values
///
/// When a queue runs dry the matching fallback is returned: `fallback_f64`
/// for samples, index 0 for choices.
///
/// # Example
/// ```
/// use preemption_sim_core::{RandomSource, ScriptedRng};
///
/// let mut rng = ScriptedRng::new(0.5)
///     .with_samples([0.05, 0.95])
///     .with_choices([1, 0]);
///
/// assert_eq!(rng.next_f64(), 0.05);
/// assert_eq!(rng.next_f64(), 0.95);
/// assert_eq!(rng.next_f64(), 0.5);
/// assert_eq!(rng.choose_index(2), 1);
/// assert_eq!(rng.choose_index(2), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    samples: VecDeque<f64>,
    choices: VecDeque<usize>,
    fallback_f64: f64,
    samples_drawn: usize,
    choices_drawn: usize,
}

impl ScriptedRng {
    /// Source that returns `fallback_f64` for every sample
    pub fn new(fallback_f64: f64) -> Self {
        Self {
            fallback_f64,
            ..Self::default()
        }
    }

    /// Queue samples for [`RandomSource::next_f64`]
    pub fn with_samples(mut self, samples: impl IntoIterator<Item = f64>) -> Self {
        self.samples.extend(samples);
        self
    }

    /// Queue indices for [`RandomSource::choose_index`]
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = usize>) -> Self {
        self.choices.extend(choices);
        self
    }

    /// Number of `next_f64` calls served so far
    pub fn samples_drawn(&self) -> usize {
        self.samples_drawn
    }

    /// Number of `choose_index` calls served so far
    pub fn choices_drawn(&self) -> usize {
        self.choices_drawn
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.samples_drawn += 1;
        self.samples.pop_front().unwrap_or(self.fallback_f64)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.choices_drawn += 1;
        // Out-of-range scripted indices wrap so a script never panics
        self.choices.pop_front().unwrap_or(0) % len.max(1)
    }
}
