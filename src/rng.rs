use std::time::SystemTimeError;
use voxell_rng::getrandom::MagicSeed;
use voxell_rng::prelude::RngCore;
use voxell_rng::rng::XorShift128;
use voxell_rng::time_seeded::TimeSeededSplitMix64;

/// Source of randomness threaded through stride selection and rule application.
///
/// Only [`next_u64`](RandomSource::next_u64) has to be provided; everything else is derived
/// from it, so tests can script exact sequences.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform value in `[0, 1)`, built from the top 53 bits of the next output.
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform-ish value in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn next_u8(&mut self) -> u8 {
        (self.next_u64() & 0xFF) as u8
    }
}

/// Seedable [`XorShift128`] stream that remembers the seed it started from.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: XorShift128,
}

impl SeededRng {
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: XorShift128::new(seed),
        }
    }

    /// Seeds from OS entropy, or from the clock if the OS refuses.
    ///
    /// Use [`seed`](SeededRng::seed) to replay the run later.
    ///
    /// # Errors
    ///
    /// Fails only if both OS entropy and the system clock are unavailable.
    pub fn from_entropy() -> Result<Self, SystemTimeError> {
        let seed = match MagicSeed::u64() {
            Ok(seed) => seed,
            Err(e) => {
                tracing::warn!(event = "os_entropy_unavailable", error = %e, "seeding from the system clock");
                TimeSeededSplitMix64::generate()?.mix()
            }
        };
        Ok(Self::new(seed))
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRng {
    fn next_u64(&mut self) -> u64 {
        RngCore::next_u64(&mut self.inner)
    }
}
