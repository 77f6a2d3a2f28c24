// src/ring/mod.rs
//! Growable ring buffer and its `std::io` adapters

mod buffer;
mod stream;

pub use buffer::{INITIAL_CAPACITY, MAX_INITIAL_CAPACITY, RingBuffer};
