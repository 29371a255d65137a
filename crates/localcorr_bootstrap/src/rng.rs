//! Seeded index generator for resampling.
//!
//! Every bootstrap iteration draws from its own stream, seeded from the
//! run's base seed and the iteration index. Results therefore depend only
//! on `(seed, iteration)`, never on which thread ran the iteration or in
//! what order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Resampling random number generator.
///
/// # Examples
///
/// ```rust
/// use localcorr_bootstrap::rng::BootstrapRng;
///
/// let mut a = BootstrapRng::for_iteration(42, 7);
/// let mut b = BootstrapRng::for_iteration(42, 7);
///
/// let mut ia = vec![0; 16];
/// let mut ib = vec![0; 16];
/// a.fill_indices(&mut ia, 100);
/// b.fill_indices(&mut ib, 100);
/// assert_eq!(ia, ib);
/// assert!(ia.iter().all(|&k| k < 100));
/// ```
pub struct BootstrapRng {
    inner: StdRng,
    seed: u64,
}

impl BootstrapRng {
    /// Creates a generator initialised with `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates the generator for iteration `iteration` of a run seeded with `base_seed`.
    #[inline]
    pub fn for_iteration(base_seed: u64, iteration: usize) -> Self {
        Self::from_seed(stream_seed(base_seed, iteration as u64))
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `[0, n)`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    #[inline]
    pub fn gen_index(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }

    /// Fills `buffer` with uniform indices in `[0, n)`.
    ///
    /// Empty buffers are a no-op; otherwise `n` must be positive.
    #[inline]
    pub fn fill_indices(&mut self, buffer: &mut [usize], n: usize) {
        for slot in buffer.iter_mut() {
            *slot = self.inner.gen_range(0..n);
        }
    }
}

/// Draws a fresh base seed from the thread-local entropy source.
pub fn entropy_seed() -> u64 {
    rand::thread_rng().gen()
}

/// Derives the seed of stream `stream` from `base`.
///
/// SplitMix64 finalisation decorrelates adjacent stream indices.
pub fn stream_seed(base: u64, stream: u64) -> u64 {
    splitmix64(base ^ splitmix64(stream))
}

#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
