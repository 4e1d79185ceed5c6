use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random draws.
///
/// The inventory never owns or seeds one; callers pass it in per call.
/// Every [`rand::Rng`] already implements this trait.
pub trait Randomness {
    /// A uniformly distributed value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// A uniformly distributed index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// A uniformly chosen element, or `None` if `items` is empty.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_index(items.len()))
    }
}

impl<R: Rng> Randomness for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Seeded randomness for reproducible selections.
#[derive(Debug, Clone)]
pub struct SeededRandomness {
    rng: StdRng,
    seed: u64,
}

impl SeededRandomness {
    /// Create a source from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Randomness for SeededRandomness {
    fn next_unit(&mut self) -> f64 {
        self.rng.next_unit()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.next_index(len)
    }
}
