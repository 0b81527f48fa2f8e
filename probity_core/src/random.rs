use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Number of usable random bits returned by a single draw.
///
/// The composition below never relies on a draw being a full 32-bit word;
/// successive draws are shifted 16 bits apart and XOR-ed so every bit of the
/// requested width receives entropy.
pub const DRAW_BITS: u32 = 31;

/// Distance, in bits, between two successive draws of a composed value.
const DRAW_STRIDE: usize = 16;

/// Errors raised by the random core.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomError {
    /// The requested integer width is not one of 1, 2, 4, 8 or 16 bytes.
    /// This is a programming error in the caller, never a runtime condition.
    #[error("unsupported type for random(): {0} byte(s) wide, expected 1, 2, 4, 8 or 16")]
    UnsupportedWidth(usize),
}

mod sealed {
    pub trait Sealed {}
}

/// Integer types that [`TestRng::random`] knows how to fill.
///
/// The trait is sealed: only the primitive integers, whose widths are all
/// supported by the composition, implement it.
pub trait RandomInt: Copy + sealed::Sealed {
    /// Width of the type in bytes.
    const WIDTH: usize;

    /// Truncates a composed value to this type.
    fn from_bits(bits: u128) -> Self;
}

macro_rules! impl_random_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl RandomInt for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn from_bits(bits: u128) -> Self {
                    bits as $t
                }
            }
        )*
    };
}

impl_random_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Returns a seed derived from the wall clock.
///
/// Used when no seed was given so that every run explores different values.
/// Record the returned value to replay a failing run.
pub fn seed_from_time() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()),
        Err(_) => 0,
    }
}

/// Number of draws needed to cover `width` bytes, or `None` when the width
/// is not supported.
fn draws_for_width(width: usize) -> Option<usize> {
    match width {
        1 | 2 => Some(1),
        4 => Some(2),
        8 => Some(4),
        16 => Some(8),
        _ => None,
    }
}

fn width_mask(width: usize) -> u128 {
    if width >= 16 {
        u128::MAX
    } else {
        (1u128 << (width * 8)) - 1
    }
}

/// A seed-reproducible generator for test inputs.
///
/// `TestRng` is the caller-owned draw state: two generators created from the
/// same seed produce the same sequence as long as they see the same sequence
/// of calls. It is not internally synchronized; share it across threads only
/// behind your own lock, since interleaved draws break reproducibility.
///
/// # Type Parameters
/// * `R`: The underlying word source. Defaults to `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct TestRng<R: RngCore = ChaCha8Rng> {
    source: R,
    seed: u64,
}

impl TestRng<ChaCha8Rng> {
    /// Creates a generator whose whole output stream is a function of `seed`.
    pub fn from_seed(seed: u64) -> Self {
        tracing::debug!(seed, "seeding test generator");
        Self::seeded(seed)
    }

    /// Creates a generator seeded from the wall clock.
    ///
    /// The seed is logged at `info` level so a failing run can be replayed
    /// with [`TestRng::from_seed`].
    pub fn from_time() -> Self {
        let seed = seed_from_time();
        tracing::info!(seed, "test generator seeded from wall clock");
        Self::seeded(seed)
    }

    fn seeded(seed: u64) -> Self {
        Self {
            source: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl<R: RngCore> TestRng<R> {
    /// Wraps an already seeded word source. `seed` is only recorded so it can
    /// be reported; it is not applied to `source`.
    pub fn with_source(source: R, seed: u64) -> Self {
        Self { source, seed }
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One draw from the underlying source, limited to [`DRAW_BITS`] bits.
    #[inline]
    pub fn draw(&mut self) -> u32 {
        self.source.next_u32() >> (32 - DRAW_BITS)
    }

    /// Fills an integer `width` bytes wide with random bits.
    ///
    /// The first draw lands in the highest position: for 8 bytes the draws
    /// are shifted by 48, 32, 16 and 0 bits. Bits above `width` are dropped.
    ///
    /// # Errors
    /// [`RandomError::UnsupportedWidth`] unless `width` is 1, 2, 4, 8 or 16.
    pub fn random_bits(&mut self, width: usize) -> Result<u128, RandomError> {
        let draws = draws_for_width(width).ok_or(RandomError::UnsupportedWidth(width))?;

        let mut bits = 0u128;
        for position in (0..draws).rev() {
            bits ^= u128::from(self.draw()) << (position * DRAW_STRIDE);
        }

        Ok(bits & width_mask(width))
    }

    /// Returns a random value of type `T` with all of its bits randomized.
    ///
    /// Note that 0 and the extreme values are very unlikely to come out of
    /// this function; test them explicitly when they matter.
    pub fn random<T: RandomInt>(&mut self) -> T {
        match self.random_bits(T::WIDTH) {
            Ok(bits) => T::from_bits(bits),
            Err(e) => panic!("{e}"),
        }
    }
}
