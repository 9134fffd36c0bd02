//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the simulator MUST go through [`RandomSource`],
//! so a run can be replayed from its seed or driven by a scripted source.

mod scripted;
mod xorshift;

pub use scripted::ScriptedRng;
pub use xorshift::RngManager;

/// Source of the two kinds of draws the simulator makes
///
/// Region eviction draws use [`RandomSource::next_f64`]; policy choices among
/// regions use [`RandomSource::choose_index`].
pub trait RandomSource: Send {
    /// Uniform sample in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Callers never pass `len == 0`.
    fn choose_index(&mut self, len: usize) -> usize;
}
