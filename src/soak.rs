// src/soak.rs
//! Randomized soak test for [`RingBuffer`].
//!
//! Each round pushes a random number of chunks, each holding a random number
//! of consecutive `u64` counter values, then drains the buffer in random
//! sized pops while it holds more than a threshold, checking that the popped
//! values continue the sequence. Chunks are deliberately unaligned with the
//! region size so head and tail keep crossing the end of the region, and the
//! buffer grows until it settles at a steady-state capacity.
//!
//! The `growring-soak` binary runs this until interrupted.

use crate::error::RingError;
use crate::ring::RingBuffer;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

const WORD: usize = std::mem::size_of::<u64>();

/// Parameters of a soak run.
#[derive(Debug, Clone)]
pub struct SoakConfig {
    /// Upper bound (inclusive) on chunks pushed per round
    pub chunk_count_max: usize,
    /// Chunk and pop sizes are drawn from `1..words_max` words
    pub words_max: usize,
    /// Draining stops once the buffer holds this many bytes or fewer
    pub drain_threshold: usize,
    /// Initial capacity of the buffer under test
    pub initial_capacity: usize,
    /// Seed of the pseudorandom generator
    pub seed: u64,
    /// Stop after this many rounds (`None` runs until stopped)
    pub rounds: Option<u64>,
    /// Log progress every this many rounds (0 disables)
    pub report_every: u64,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            chunk_count_max: 20,
            words_max: 2048,
            drain_threshold: 1024,
            initial_capacity: crate::ring::INITIAL_CAPACITY,
            seed: 0x5EED_0F_F00D,
            rounds: None,
            report_every: 10_000,
        }
    }
}

/// Counters collected over a soak run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoakReport {
    /// Completed rounds
    pub rounds: u64,
    /// Counter values pushed
    pub written: u64,
    /// Counter values popped and checked
    pub read: u64,
    /// Popped values that did not continue the sequence
    pub mismatches: u64,
    /// Largest capacity the buffer reached
    pub max_capacity: usize,
}

impl SoakReport {
    /// Returns `true` if every popped value matched.
    pub fn is_clean(&self) -> bool {
        self.mismatches == 0
    }
}

/// Failures that abort a soak run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoakError {
    /// The buffer rejected an operation
    Ring(RingError),
    /// `len()` disagrees with the number of bytes the driver accounted for
    LengthDrift {
        /// Bytes pushed and not yet popped
        expected: usize,
        /// What the buffer reported
        actual: usize,
    },
}

impl fmt::Display for SoakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring(err) => write!(f, "Ring buffer error: {}", err),
            Self::LengthDrift { expected, actual } => write!(
                f,
                "Ring buffer length drifted: expected {} bytes, found {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for SoakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ring(err) => Some(err),
            Self::LengthDrift { .. } => None,
        }
    }
}

impl From<RingError> for SoakError {
    fn from(err: RingError) -> Self {
        SoakError::Ring(err)
    }
}

/// SplitMix64 pseudorandom generator.
///
/// Deterministic for a given seed, so a failing run can be replayed.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Returns the next 64 random bits.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut x = self.state;
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^ (x >> 31)
    }

    /// Returns a value in `low..=high`.
    ///
    /// # Panics
    ///
    /// Panics if `low > high`.
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "empty range {}..={}", low, high);
        let span = (high - low) as u64 + 1;
        low + (self.next_u64() % span) as usize
    }
}

/// Drives one [`RingBuffer`] through soak rounds.
pub struct Soak {
    config: SoakConfig,
    rng: SplitMix64,
    ring: RingBuffer,
    scratch: Vec<u8>,
    next_write: u64,
    next_read: u64,
    tracked: usize,
    report: SoakReport,
}

impl Soak {
    /// Creates a soak driver.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_count_max` is 0, `words_max` is below 2, or
    /// `initial_capacity` is rejected by [`RingBuffer::with_capacity`].
    pub fn new(config: SoakConfig) -> Self {
        assert!(config.chunk_count_max >= 1, "chunk_count_max must be at least 1");
        assert!(config.words_max >= 2, "words_max must be at least 2");

        let ring = RingBuffer::with_capacity(config.initial_capacity);
        let report = SoakReport {
            max_capacity: ring.capacity(),
            ..SoakReport::default()
        };

        Self {
            rng: SplitMix64::new(config.seed),
            scratch: vec![0; config.words_max * WORD],
            ring,
            next_write: 0,
            next_read: 0,
            tracked: 0,
            report,
            config,
        }
    }

    /// Returns the counters so far.
    pub fn report(&self) -> SoakReport {
        self.report
    }

    /// Returns the buffer under test.
    pub fn ring(&self) -> &RingBuffer {
        &self.ring
    }

    /// Runs one push phase followed by one drain phase.
    pub fn round(&mut self) -> Result<(), SoakError> {
        let chunks = self.rng.range_inclusive(1, self.config.chunk_count_max);

        for _ in 0..chunks {
            let words = self.rng.range_inclusive(1, self.config.words_max - 1);
            let bytes = &mut self.scratch[..words * WORD];

            for slot in bytes.chunks_exact_mut(WORD) {
                slot.copy_from_slice(&self.next_write.to_ne_bytes());
                self.next_write += 1;
            }

            self.ring.push(bytes)?;
            self.tracked += words * WORD;
        }

        self.report.max_capacity = self.report.max_capacity.max(self.ring.capacity());
        self.check_length()?;

        while self.ring.len() > self.config.drain_threshold {
            let mut words = self.rng.range_inclusive(1, self.config.words_max - 1);
            if words * WORD > self.ring.len() {
                words = self.ring.len() / WORD;
            }

            let bytes = &mut self.scratch[..words * WORD];
            self.ring.pop(bytes)?;

            for slot in bytes.chunks_exact(WORD) {
                let mut word = [0u8; WORD];
                word.copy_from_slice(slot);
                let actual = u64::from_ne_bytes(word);

                if actual != self.next_read {
                    tracing::warn!(expected = self.next_read, actual, "sequence mismatch");
                    self.report.mismatches += 1;
                }
                self.next_read += 1;
            }

            self.tracked -= words * WORD;
        }

        self.check_length()?;

        self.report.rounds += 1;
        self.report.written = self.next_write;
        self.report.read = self.next_read;
        Ok(())
    }

    /// Runs rounds until `stop` is set or the configured round limit is hit.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<SoakReport, SoakError> {
        tracing::info!(seed = self.config.seed, "starting soak run");

        while !stop.load(Ordering::Relaxed) {
            if self
                .config
                .rounds
                .is_some_and(|limit| self.report.rounds >= limit)
            {
                break;
            }

            self.round()?;

            if self.config.report_every > 0 && self.report.rounds % self.config.report_every == 0 {
                tracing::info!(
                    written = self.report.written,
                    read = self.report.read,
                    capacity = self.ring.capacity(),
                    "soak progress"
                );
            }
        }

        Ok(self.report)
    }

    fn check_length(&self) -> Result<(), SoakError> {
        if self.ring.len() != self.tracked {
            return Err(SoakError::LengthDrift {
                expected: self.tracked,
                actual: self.ring.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rounds: u64, seed: u64) -> SoakConfig {
        SoakConfig {
            seed,
            rounds: Some(rounds),
            report_every: 0,
            ..SoakConfig::default()
        }
    }

    #[test]
    fn test_splitmix_is_deterministic() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert_ne!(SplitMix64::new(1).next_u64(), SplitMix64::new(2).next_u64());
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = SplitMix64::new(7);
        let mut seen_low = false;
        let mut seen_high = false;

        for _ in 0..10_000 {
            let value = rng.range_inclusive(1, 4);
            assert!((1..=4).contains(&value));
            seen_low |= value == 1;
            seen_high |= value == 4;
        }
        assert!(seen_low && seen_high);
        assert_eq!(rng.range_inclusive(9, 9), 9);
    }

    #[test]
    fn test_soak_rounds_are_clean() {
        let mut soak = Soak::new(config(200, 0xC0FFEE));
        let report = soak.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(report.rounds, 200);
        assert!(report.is_clean());
        assert!(report.read > 0);
        assert!(report.max_capacity > crate::ring::INITIAL_CAPACITY);
        assert!(soak.ring().len() <= SoakConfig::default().drain_threshold);
        assert_eq!(
            (report.written - report.read) as usize * WORD,
            soak.ring().len()
        );
        assert!(soak.ring().check_invariant());
    }

    #[test]
    fn test_small_buffer_and_chunks() {
        let mut soak = Soak::new(SoakConfig {
            chunk_count_max: 3,
            words_max: 9,
            drain_threshold: 16,
            initial_capacity: 2,
            ..config(2_000, 3)
        });
        let report = soak.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(report.rounds, 2_000);
        assert!(report.is_clean());
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = Soak::new(config(50, 99)).run(&AtomicBool::new(false)).unwrap();
        let b = Soak::new(config(50, 99)).run(&AtomicBool::new(false)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stop_flag_prevents_rounds() {
        let mut soak = Soak::new(config(10, 1));
        let report = soak.run(&AtomicBool::new(true)).unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(report.written, 0);
    }
}
