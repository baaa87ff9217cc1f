//! Deterministic deal randomness.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the identical sequence of deals
//! - **Session stream**: Each reset draws the next deal from the same stream,
//!   so consecutive games differ while a seed still reproduces the session
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use klondike_engine::core::DealRng;
//!
//! let mut a = DealRng::new(7);
//! let mut b = DealRng::new(7);
//!
//! let mut first = vec![1, 2, 3, 4, 5, 6, 7, 8];
//! let mut second = first.clone();
//! a.shuffle(&mut first);
//! b.shuffle(&mut second);
//! assert_eq!(first, second);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG used to shuffle decks.
///
/// Uses ChaCha8 for speed. The quality of the stream is not a concern of the
/// engine, only its reproducibility.
#[derive(Clone, Debug)]
pub struct DealRng {
    inner: ChaCha8Rng,
    seed: u64,
    deals: u64,
}

impl DealRng {
    /// Start a deal stream from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            deals: 0,
        }
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of shuffles drawn from this stream so far.
    #[must_use]
    pub fn deals(&self) -> u64 {
        self.deals
    }

    /// Shuffle in place, counting one deal.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
        self.deals += 1;
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> DealRngState {
        DealRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            deals: self.deals,
        }
    }

    /// Resume a captured stream.
    #[must_use]
    pub fn from_state(state: &DealRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            deals: state.deals,
        }
    }
}

/// Serializable RNG state.
///
/// Uses ChaCha8 word position, so capture is O(1) however many deals have
/// been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRngState {
    pub seed: u64,
    pub word_pos: u128,
    pub deals: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = DealRng::new(42);
        let mut rng2 = DealRng::new(42);

        for _ in 0..5 {
            let mut a: Vec<u8> = (0..52).collect();
            let mut b = a.clone();
            rng1.shuffle(&mut a);
            rng2.shuffle(&mut b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_consecutive_deals_differ() {
        let mut rng = DealRng::new(42);
        let mut a: Vec<u8> = (0..52).collect();
        let mut b = a.clone();

        rng.shuffle(&mut a);
        rng.shuffle(&mut b);

        assert_ne!(a, b);
        assert_eq!(rng.deals(), 2);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = DealRng::new(9);
        let mut data: Vec<u8> = (0..52).collect();
        rng.shuffle(&mut data);
        data.sort_unstable();
        assert_eq!(data, (0..52).collect::<Vec<u8>>());
    }

    #[test]
    fn test_state_restore() {
        let mut rng = DealRng::new(42);
        let mut scratch: Vec<u8> = (0..52).collect();
        rng.shuffle(&mut scratch);

        let state = rng.state();

        let mut expected: Vec<u8> = (0..52).collect();
        rng.shuffle(&mut expected);

        let mut restored = DealRng::from_state(&state);
        let mut actual: Vec<u8> = (0..52).collect();
        restored.shuffle(&mut actual);

        assert_eq!(expected, actual);
        assert_eq!(restored.deals(), 2);
    }

    #[test]
    fn test_state_json() {
        let state = DealRngState {
            seed: 42,
            word_pos: 4096,
            deals: 3,
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: DealRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, back);
    }
}
