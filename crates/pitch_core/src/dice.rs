//! `DiceSource` abstraction: all randomness in the resolver flows through
//! this trait so a deterministic scripted source can replace it in tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait DiceSource {
    /// `n` independent uniform integers in `[1, sides]`.
    fn roll(&mut self, sides: u32, n: u32) -> Vec<u32>;

    fn roll_one(&mut self, sides: u32) -> u32 {
        self.roll(sides, 1)[0]
    }
}

/// Production dice source: a seeded `ChaCha8Rng`, chosen for reproducible
/// simulation runs from a fixed seed.
pub struct RngDiceSource {
    rng: ChaCha8Rng,
}

impl RngDiceSource {
    pub fn from_seed(seed: u64) -> Self {
        RngDiceSource { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        RngDiceSource { rng: ChaCha8Rng::from_entropy() }
    }
}

impl DiceSource for RngDiceSource {
    fn roll(&mut self, sides: u32, n: u32) -> Vec<u32> {
        (0..n).map(|_| self.rng.gen_range(1..=sides)).collect()
    }
}

/// Test dice source: a scripted sequence of results, cycling once
/// exhausted so a long scenario doesn't need to enumerate every roll.
pub struct ScriptedDiceSource {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedDiceSource {
    pub fn new(values: Vec<u32>) -> Self {
        assert!(!values.is_empty(), "ScriptedDiceSource needs at least one value");
        ScriptedDiceSource { values, cursor: 0 }
    }
}

impl DiceSource for ScriptedDiceSource {
    fn roll(&mut self, _sides: u32, n: u32) -> Vec<u32> {
        (0..n)
            .map(|_| {
                let v = self.values[self.cursor % self.values.len()];
                self.cursor += 1;
                v
            })
            .collect()
    }
}
