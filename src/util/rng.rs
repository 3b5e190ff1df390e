// Copyright (c) 2024 Mike Tsao

//! Provides random-number sources for noise generation and testing.

use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// The minimal capability that noise-producing devices need from a
/// random-number generator. Devices own a boxed [RandomSource], so tests can
/// substitute a [ScriptedRandom] to make output exactly predictable.
pub trait RandomSource: core::fmt::Debug + Send {
    /// Returns a uniformly distributed value in [0.0, 1.0).
    fn next_double(&mut self) -> f64;

    /// Returns a uniformly distributed value in [0, bound). `bound` must be
    /// nonzero.
    fn next_int(&mut self, bound: usize) -> usize;
}

/// A pseudorandom number generator (PRNG) for applications such as
/// digital-audio libraries that don't require cryptographically secure random
/// numbers.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        // We want to panic if this fails, because it indicates that a core OS
        // facility isn't functioning.
        Self::new_with_seed(Self::generate_seed().unwrap())
    }
}
#[allow(missing_docs)]
impl Rng {
    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing test failures.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Create a sufficiently high-quality random number that's suitable for
    /// [Rng].
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    delegate! {
        to self.0 {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_i64(&mut self) -> i64;
            pub fn rand_float(&mut self) -> f64;
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }
}
impl RandomSource for Rng {
    fn next_double(&mut self) -> f64 {
        self.rand_float()
    }

    fn next_int(&mut self, bound: usize) -> usize {
        self.rand_range(0..bound as u64) as usize
    }
}

/// A [RandomSource] that replays fixed sequences, cycling back to the start of
/// each when it runs out. An empty sequence always yields zero.
///
/// ```
/// use hissmix::util::{RandomSource, ScriptedRandom};
///
/// let mut r = ScriptedRandom::new_with(vec![0.25, 0.75], vec![3, 9]);
/// assert_eq!(r.next_double(), 0.25);
/// assert_eq!(r.next_double(), 0.75);
/// assert_eq!(r.next_double(), 0.25);
/// assert_eq!(r.next_int(8), 3);
/// assert_eq!(r.next_int(8), 1); // 9 % 8
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    doubles: Vec<f64>,
    ints: Vec<usize>,
    next_double_index: usize,
    next_int_index: usize,
}
impl ScriptedRandom {
    /// Creates a source that yields `doubles` from [RandomSource::next_double()]
    /// and `ints` from [RandomSource::next_int()].
    pub fn new_with(doubles: Vec<f64>, ints: Vec<usize>) -> Self {
        Self {
            doubles,
            ints,
            ..Default::default()
        }
    }
}
impl RandomSource for ScriptedRandom {
    fn next_double(&mut self) -> f64 {
        if self.doubles.is_empty() {
            return 0.0;
        }
        let r = self.doubles[self.next_double_index];
        self.next_double_index = (self.next_double_index + 1) % self.doubles.len();
        r
    }

    fn next_int(&mut self, bound: usize) -> usize {
        if self.ints.is_empty() {
            return 0;
        }
        let r = self.ints[self.next_int_index];
        self.next_int_index = (self.next_int_index + 1) % self.ints.len();
        r % bound
    }
}
