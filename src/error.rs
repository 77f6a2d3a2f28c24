// src/error.rs
//! Error types for ring buffer operations

use std::fmt;

/// Errors that can occur while pushing into or popping from a [`RingBuffer`].
///
/// [`RingBuffer`]: crate::RingBuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    /// A pop, peek or skip asked for more bytes than are stored.
    ///
    /// The buffer is left untouched.
    Underflow {
        /// Bytes asked for
        requested: usize,
        /// Bytes currently stored
        available: usize,
    },
    /// Growing the backing region failed, either because the allocator
    /// refused or because the doubled capacity overflowed.
    ///
    /// The buffer is left exactly as it was before the push.
    AllocationFailed {
        /// Capacity that could not be allocated (saturated on overflow)
        requested: usize,
    },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow {
                requested,
                available,
            } => write!(
                f,
                "Ring buffer underflow: requested {} bytes, {} available",
                requested, available
            ),
            Self::AllocationFailed { requested } => {
                write!(f, "Failed to grow ring buffer to {} bytes", requested)
            }
        }
    }
}

impl std::error::Error for RingError {}

/// Convert RingError to std::io::Error
impl From<RingError> for std::io::Error {
    fn from(err: RingError) -> Self {
        use std::io::ErrorKind;
        match err {
            RingError::Underflow { .. } => std::io::Error::new(ErrorKind::UnexpectedEof, err),
            RingError::AllocationFailed { .. } => {
                std::io::Error::new(ErrorKind::OutOfMemory, err)
            }
        }
    }
}

// Conversion to anyhow::Error is provided by anyhow's blanket
// `impl<E: std::error::Error + Send + Sync + 'static> From<E>`.

/// Result type alias for ring buffer operations
pub type Result<T> = std::result::Result<T, RingError>;

/// Extension trait for converting ring buffer results into other error types
pub trait ResultExt<T> {
    /// Convert to anyhow::Result
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Convert to io::Result
    fn into_io(self) -> std::io::Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    fn into_io(self) -> std::io::Result<T> {
        self.map_err(|e| e.into())
    }
}
