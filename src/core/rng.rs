//! Deterministic Random Number Generator
//!
//! Uses the Marsaglia xorshift32 algorithm for fast, reproducible
//! randomness. Given the same seed, produces an identical sequence on all
//! platforms, which is what makes a session replayable from its seed
//! (e.g. a day number).

use serde::{Deserialize, Serialize};

/// Deterministic PRNG using the xorshift32 algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence of
/// draws on any platform, forever. Call order is the only determinant of
/// output; there is no internal buffering.
///
/// # Seed handling
///
/// The seed is a 32-bit signed integer. Seed `0` is remapped to
/// `i32::MIN`: a xorshift register that is all zeros is a fixed point of
/// the shift sequence and would never leave it.
///
/// # Example
///
/// ```
/// use word_siege::core::rng::GameRng;
///
/// let mut a = GameRng::new(20_240_106);
/// let mut b = GameRng::new(20_240_106);
/// assert_eq!(a.next_int(0, 29), b.next_int(0, 29));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRng {
    state: u32,
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameRng {
    /// Create a new RNG from a 32-bit signed seed.
    ///
    /// Seed `0` is remapped to `i32::MIN` (see type-level docs).
    pub fn new(seed: i32) -> Self {
        let seed = if seed == 0 { i32::MIN } else { seed };
        Self { state: seed as u32 }
    }

    /// Advance the register and return the next raw 32-bit value.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Generate the next float in `[0, 1)`.
    #[inline]
    pub fn next_float(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Generate a random integer in `[start, end)`.
    ///
    /// Requires `start < end`. The result is clamped into range to guard
    /// against floating-point artifacts at the upper boundary.
    ///
    /// # Panics
    ///
    /// Panics if `start >= end` (an empty range has no valid draw).
    #[inline]
    pub fn next_int(&mut self, start: i32, end: i32) -> i32 {
        assert!(start < end, "next_int requires start < end ({start} >= {end})");
        // Work in i64: the span of an i32 range can overflow i32.
        let span = end as i64 - start as i64;
        let raw = start as i64 + (self.next_float() * span as f64) as i64;
        raw.clamp(start as i64, end as i64 - 1) as i32
    }

    /// Get the current register (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }
}
