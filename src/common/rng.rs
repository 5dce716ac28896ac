//! Deterministic random sources
//!
//! Every random draw in the tracker goes through a caller-supplied
//! [`rand::Rng`]. [`SimpleRng`] is the seedable generator used by the binary
//! and the tests; [`stream_seed`] derives independent per-round seeds so
//! parallel projection rounds never share a stream.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

use super::constants::STREAM_STRIDE;

/// Simple deterministic random number generator using Xorshift64.
///
/// Identical seeds produce identical sequences on every platform, which keeps
/// whole tracking runs reproducible.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new SimpleRng with the given seed.
    /// If seed is 0, uses 1 instead to avoid degenerate state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Generator for round `stream` of a base seed
    pub fn for_stream(base_seed: u64, stream: usize) -> Self {
        Self::new(stream_seed(base_seed, stream))
    }

    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl rand::RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Seed for an independent stream derived from `base_seed`
#[inline]
pub fn stream_seed(base_seed: u64, stream: usize) -> u64 {
    base_seed.wrapping_add((stream as u64 + 1).wrapping_mul(STREAM_STRIDE))
}

/// Matrix of i.i.d. `N(0, std^2)` entries
pub fn gaussian_matrix<R: Rng>(rng: &mut R, rows: usize, cols: usize, std: f64) -> DMatrix<f64> {
    DMatrix::from_fn(rows, cols, |_, _| std * rng.sample::<f64, _>(StandardNormal))
}

/// Copy of `base` with `N(0, std^2)` noise added to every entry
pub fn jitter<R: Rng>(rng: &mut R, base: &DVector<f64>, std: f64) -> DVector<f64> {
    base.map(|v| v + std * rng.sample::<f64, _>(StandardNormal))
}
