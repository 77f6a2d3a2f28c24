// src/ring/stream.rs
//! `std::io` adapters so a [`RingBuffer`] can sit between a byte producer and
//! a consumer, e.g. as the staging area of a streaming transport.
//!
//! Writes never short-write: the buffer grows instead. Reads return whatever
//! is stored, up to the length of the destination, and `Ok(0)` when empty.

use super::RingBuffer;
use std::io::{self, Read, Write};

impl Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.push(buf)?;
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.len());
        self.pop(&mut buf[..n])?;
        Ok(n)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.pop(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut ring = RingBuffer::with_capacity(8);
        assert_eq!(ring.write(b"stream data").unwrap(), 11);
        ring.flush().unwrap();

        let mut output = [0u8; 6];
        assert_eq!(ring.read(&mut output).unwrap(), 6);
        assert_eq!(&output, b"stream");

        // short read once the buffer runs dry
        assert_eq!(ring.read(&mut output).unwrap(), 5);
        assert_eq!(&output[..5], b" data");
        assert_eq!(ring.read(&mut output).unwrap(), 0);
    }

    #[test]
    fn test_read_exact_underflow_is_unexpected_eof() {
        let mut ring = RingBuffer::new();
        ring.write_all(b"abc").unwrap();

        let mut output = [0u8; 8];
        let err = ring.read_exact(&mut output).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_io_copy_through_ring() {
        let source = (0..5000u32).map(|i| (i % 256) as u8).collect::<Vec<_>>();
        let mut ring = RingBuffer::new();

        io::copy(&mut &source[..], &mut ring).unwrap();
        assert_eq!(ring.len(), source.len());

        let mut sink = Vec::new();
        ring.read_to_end(&mut sink).unwrap();
        assert_eq!(sink, source);
        assert!(ring.is_empty());
    }
}
