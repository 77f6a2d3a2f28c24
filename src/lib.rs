// src/lib.rs
//! # Growable Ring Buffer
//!
//! A contiguous circular byte buffer for staging opaque byte payloads of
//! arbitrary, record-unaligned length between a producer and a consumer.
//!
//! Features:
//! - Variable-length `push`/`pop` of raw byte spans with wraparound
//! - Automatic amortized growth by capacity doubling, with fallible allocation
//! - Typed underflow errors instead of silent truncation
//! - Released regions are securely zeroed using the `zeroize` crate
//! - `std::io::Read`/`Write` adapters for streaming use
//! - A randomized soak driver (`soak`) usable as a correctness oracle
//!
//! The buffer is single-threaded: wrap it in your own lock to share it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ring;
pub mod soak;

// Re-export main types
pub use error::{Result, ResultExt, RingError};
pub use ring::{INITIAL_CAPACITY, MAX_INITIAL_CAPACITY, RingBuffer};
pub use soak::{Soak, SoakConfig, SoakError, SoakReport};

/// Commonly used imports.
pub mod prelude {
    pub use crate::error::{Result, ResultExt, RingError};
    pub use crate::ring::RingBuffer;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_ring_buffer() {
        let mut ring = RingBuffer::new();

        ring.push(b"Chunk 1 | ").unwrap();
        ring.push(b"Chunk 2 | ").unwrap();
        ring.push(b"Chunk 3").unwrap();

        let mut output = vec![0u8; ring.len()];
        ring.pop(&mut output).unwrap();

        assert_eq!(&output, b"Chunk 1 | Chunk 2 | Chunk 3");
    }

    #[test]
    fn test_underflow_into_io() {
        let mut ring = RingBuffer::new();
        let mut output = [0u8; 1];

        let err = ring.pop(&mut output).into_io().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
