// src/ring/buffer.rs
//! Growable circular byte buffer with secure memory release
//!
//! # Layout
//!
//! The buffer owns a single contiguous region. The occupied range starts at
//! `head` and ends one byte before `tail`, possibly wrapping around the end of
//! the region. One byte of the region is never used: a push that would make
//! `len() == capacity()` grows the region first, so `len() < capacity()` holds
//! after every operation.
//!
//! # Growth
//!
//! Growth doubles the capacity, repeatedly if a single push is large, and
//! linearizes the stored bytes to offset zero of the new region. The final
//! capacity is worked out before anything is allocated, so the buffer moves
//! at most once per push. Allocation is fallible: if the new region cannot be
//! obtained the push fails with [`RingError::AllocationFailed`] and the buffer
//! is left exactly as it was.
//!
//! # Memory Safety
//!
//! Every region the buffer releases (the old region after a growth, and the
//! live region on drop) is zeroed with [`zeroize`] first.

use crate::error::{RingError, Result};
use std::fmt;
use zeroize::Zeroize;

/// Capacity of a buffer created with [`RingBuffer::new`].
pub const INITIAL_CAPACITY: usize = std::mem::size_of::<f64>() * 16;

/// Largest capacity accepted by [`RingBuffer::with_capacity`] (1GB).
///
/// This only bounds the initial allocation; growth is limited by the allocator.
pub const MAX_INITIAL_CAPACITY: usize = 1_000_000_000;

/// A growable FIFO of raw bytes backed by a circular region.
///
/// Bytes are enqueued with [`push`](Self::push) and dequeued with
/// [`pop`](Self::pop) in arbitrary, unaligned chunk sizes. The buffer is
/// move-only; use [`std::mem::take`] to move the region out and leave an
/// empty buffer behind.
///
/// # Example
///
/// ```rust
/// use growring::RingBuffer;
///
/// let mut ring = RingBuffer::new();
/// ring.push(b"Hello, ")?;
/// ring.push(b"World!")?;
///
/// let mut output = vec![0u8; ring.len()];
/// ring.pop(&mut output)?;
/// assert_eq!(&output, b"Hello, World!");
/// assert!(ring.is_empty());
/// # Ok::<(), growring::RingError>(())
/// ```
pub struct RingBuffer {
    /// Backing region, its length is the capacity
    data: Box<[u8]>,
    /// Number of valid bytes
    size: usize,
    /// Offset of the oldest valid byte
    head: usize,
    /// Offset of the next write
    tail: usize,
}

impl RingBuffer {
    /// Creates an empty buffer with [`INITIAL_CAPACITY`] bytes of backing storage.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty buffer with an explicit initial capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is smaller than 2 or exceeds [`MAX_INITIAL_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity >= 2,
            "Ring buffer capacity {} is below the minimum of 2",
            capacity
        );
        assert!(
            capacity <= MAX_INITIAL_CAPACITY,
            "Ring buffer capacity {} exceeds maximum {}",
            capacity,
            MAX_INITIAL_CAPACITY
        );

        Self {
            data: vec![0; capacity].into_boxed_slice(),
            size: 0,
            head: 0,
            tail: 0,
        }
    }

    /// Returns the number of bytes currently stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no bytes are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the size of the backing region.
    ///
    /// Always strictly greater than [`len`](Self::len).
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Appends `bytes` to the back of the buffer, growing it if needed.
    ///
    /// Growth happens whenever `len() + bytes.len() >= capacity()`, so a push
    /// that would exactly fill the region grows it as well. An empty slice is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::AllocationFailed`] if the region cannot be grown.
    /// The buffer is unchanged in that case: same capacity, same bytes.
    pub fn push(&mut self, bytes: &[u8]) -> Result<()> {
        let n = bytes.len();
        if n == 0 {
            return Ok(());
        }

        if self.size + n >= self.capacity() {
            let capacity = grown_capacity(self.capacity(), self.size + n)?;
            self.grow_to(capacity)?;
        }

        let capacity = self.capacity();
        if self.tail + n <= capacity {
            self.data[self.tail..self.tail + n].copy_from_slice(bytes);
            self.tail += n;

            if self.tail == capacity {
                self.tail = 0;
            }
        } else {
            let first = capacity - self.tail;
            let second = n - first;
            tracing::trace!(first, second, "split push across region end");

            self.data[self.tail..].copy_from_slice(&bytes[..first]);
            self.data[..second].copy_from_slice(&bytes[first..]);

            self.tail = second;
            debug_assert!(self.tail < self.head);
        }

        self.size += n;
        debug_assert!(self.check_invariant());
        Ok(())
    }

    /// Removes `output.len()` bytes from the front of the buffer into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::Underflow`] if fewer than `output.len()` bytes are
    /// stored. Nothing is copied and the buffer is unchanged.
    pub fn pop(&mut self, output: &mut [u8]) -> Result<()> {
        self.ensure_available(output.len())?;
        self.copy_front(output);
        self.advance_head(output.len());
        Ok(())
    }

    /// Copies `output.len()` bytes from the front of the buffer without
    /// consuming them.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::Underflow`] if fewer than `output.len()` bytes are
    /// stored.
    pub fn peek(&self, output: &mut [u8]) -> Result<()> {
        self.ensure_available(output.len())?;
        self.copy_front(output);
        Ok(())
    }

    /// Discards `len` bytes from the front of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::Underflow`] if fewer than `len` bytes are stored.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.ensure_available(len)?;
        self.advance_head(len);
        Ok(())
    }

    /// Returns the stored bytes in logical order as two slices (zero-copy).
    ///
    /// The second slice is empty unless the stored range wraps around the end
    /// of the region.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        if self.head + self.size <= self.capacity() {
            (&self.data[self.head..self.head + self.size], &[])
        } else {
            (&self.data[self.head..], &self.data[..self.tail])
        }
    }

    /// Pops every stored byte into a new vector.
    pub fn drain_to_vec(&mut self) -> Vec<u8> {
        let mut output = vec![0; self.size];
        self.copy_front(&mut output);
        self.advance_head(output.len());
        output
    }

    /// Forgets all stored bytes without releasing or shrinking the region.
    #[inline]
    pub fn clear(&mut self) {
        self.size = 0;
        self.head = 0;
        self.tail = 0;
    }

    /// Checks the bookkeeping invariants.
    ///
    /// Returns `true` when `len() < capacity()`, both offsets lie inside the
    /// region, and the occupied count derived from `head`/`tail` equals
    /// `len()`. Every public operation preserves this; debug builds assert it.
    pub fn check_invariant(&self) -> bool {
        let capacity = self.capacity();
        self.size < capacity
            && self.head < capacity
            && self.tail < capacity
            && self.size == self.computed_size()
    }

    fn computed_size(&self) -> usize {
        if self.head <= self.tail {
            self.tail - self.head
        } else {
            self.capacity() - self.head + self.tail
        }
    }

    #[inline]
    fn ensure_available(&self, requested: usize) -> Result<()> {
        if requested > self.size {
            return Err(RingError::Underflow {
                requested,
                available: self.size,
            });
        }
        Ok(())
    }

    /// Copies the first `output.len()` stored bytes. Caller checks the length.
    fn copy_front(&self, output: &mut [u8]) {
        let n = output.len();
        let capacity = self.capacity();

        if self.head + n <= capacity {
            output.copy_from_slice(&self.data[self.head..self.head + n]);
        } else {
            let first = capacity - self.head;
            output[..first].copy_from_slice(&self.data[self.head..]);
            output[first..].copy_from_slice(&self.data[..n - first]);
        }
    }

    /// Moves `head` forward by `n` stored bytes. Caller checks the length.
    fn advance_head(&mut self, n: usize) {
        let capacity = self.capacity();

        if self.head + n <= capacity {
            self.head += n;

            if self.head == capacity {
                self.head = 0;
            }
        } else {
            self.head = n - (capacity - self.head);
            debug_assert!(self.head <= self.tail);
        }

        self.size -= n;
        debug_assert!(self.check_invariant());
    }

    /// Moves the stored bytes into a new region of `capacity` bytes,
    /// linearized to offset zero.
    ///
    /// Either installs the new region completely or leaves `self` untouched.
    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        debug_assert!(capacity > self.size);

        let mut region = Vec::new();
        region
            .try_reserve_exact(capacity)
            .map_err(|_| RingError::AllocationFailed {
                requested: capacity,
            })?;

        if self.size > 0 {
            if self.head < self.tail {
                region.extend_from_slice(&self.data[self.head..self.tail]);
            } else {
                region.extend_from_slice(&self.data[self.head..]);
                region.extend_from_slice(&self.data[..self.tail]);
            }
        }
        region.resize(capacity, 0);

        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity = capacity,
            len = self.size,
            "growing ring buffer"
        );

        let old = std::mem::replace(&mut self.data, region.into_boxed_slice());
        scrub(old);

        self.head = 0;
        self.tail = self.size;
        debug_assert!(self.check_invariant());
        Ok(())
    }
}

/// Doubles `capacity` until it is strictly greater than `needed`.
///
/// Lands on the same capacity one doubling per overflowing push would, but
/// the buffer relocates only once.
fn grown_capacity(mut capacity: usize, needed: usize) -> Result<usize> {
    while needed >= capacity {
        capacity = capacity
            .checked_mul(2)
            .ok_or(RingError::AllocationFailed {
                requested: usize::MAX,
            })?;
    }
    Ok(capacity)
}

/// Zeroes a released region before handing it back to the allocator.
fn scrub(region: Box<[u8]>) {
    // into_vec keeps the same allocation, so the live bytes are the ones zeroed
    let mut vec = region.into_vec();
    vec.zeroize();
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RingBuffer {
    /// Shows bookkeeping only; stored bytes are never printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.size)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

impl Drop for RingBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}
