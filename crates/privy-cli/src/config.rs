//! Settings for `privy pick`.

use privy_core::SeededRandomness;

/// Seed and draw count for one sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickConfig {
    /// Seed handed to [`SeededRandomness`], so a run can be replayed.
    pub seed: u64,
    /// How many members to draw. Never zero.
    ///
    /// The default of 1000 keeps the observed field share within a few
    /// percent of the expected ratio for typical inventories.
    pub draws: usize,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            draws: 1000,
        }
    }
}

impl PickConfig {
    /// Replace the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the draw count. Zero becomes one.
    pub fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws.max(1);
        self
    }

    /// A fresh randomness source for this run.
    pub fn randomness(&self) -> SeededRandomness {
        SeededRandomness::new(self.seed)
    }
}
