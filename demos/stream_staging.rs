// demos/stream_staging.rs
//! Demonstrates staging a byte stream through a growable ring buffer

use growring::prelude::*;
use std::io::{self, Read, Write};

// RingError converts into io::Error, so `?` works for both kinds of call
fn main() -> io::Result<()> {
    println!("=== Stream Staging Example ===\n");

    let mut stream = RingBuffer::new();

    // Simulate frames arriving from a transport
    let chunks: Vec<&[u8]> = vec![
        b"This is the first chunk of streaming data. ",
        b"Here comes the second chunk with more information. ",
        b"And finally, the third chunk to complete the message.",
    ];

    println!("Pushing chunks...");
    for (i, chunk) in chunks.iter().enumerate() {
        stream.push(chunk)?;
        println!(
            "Chunk {}: pushed {} bytes (buffer: {}/{})",
            i + 1,
            chunk.len(),
            stream.len(),
            stream.capacity()
        );
    }

    // Consume in fixed-size records that don't line up with the chunks
    println!("\nPopping in 50-byte records:");
    let mut record_num = 1;
    while !stream.is_empty() {
        let mut output = vec![0u8; stream.len().min(50)];
        stream.pop(&mut output)?;
        println!("Record {}: {:?}", record_num, String::from_utf8_lossy(&output));
        record_num += 1;
    }

    println!("\n=== Wraparound Demonstration ===\n");

    let mut ring = RingBuffer::with_capacity(64);
    ring.push(b"1234567890123456789012345678901234567890")?;
    ring.skip(20)?;
    println!("After skipping 20 bytes: {} stored", ring.len());

    ring.push(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ")?;
    let (front, back) = ring.as_slices();
    println!("Front slice: {:?}", String::from_utf8_lossy(front));
    println!("Back slice:  {:?}", String::from_utf8_lossy(back));
    println!("Capacity unchanged: {}", ring.capacity());

    println!("\n=== Peek and std::io ===\n");

    let mut io_ring = RingBuffer::new();
    io_ring.write_all(b"header:payload")?;

    let mut header = [0u8; 7];
    io_ring.peek(&mut header)?;
    println!("Peeked: {:?}", String::from_utf8_lossy(&header));

    let mut text = String::new();
    io_ring.read_to_string(&mut text)?;
    println!("Read back: {:?}", text);
    println!("Buffer now has: {} bytes", io_ring.len());

    Ok(())
}
