//! Property tests for `RingBuffer` against a `VecDeque<u8>` model.
//!
//! Random sequences of pushes and pops are applied to both the ring buffer
//! and the model; after every step the bookkeeping invariant must hold and
//! popped bytes must match the model exactly.

use std::collections::VecDeque;

use growring::{RingBuffer, RingError};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(Vec<u8>),
    Pop(usize),
    Peek(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::collection::vec(any::<u8>(), 0..300).prop_map(Op::Push),
        2 => (0usize..400).prop_map(Op::Pop),
        1 => (0usize..64).prop_map(Op::Peek),
    ]
}

proptest! {
    #[test]
    fn prop_matches_fifo_model(
        initial in 2usize..64,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut ring = RingBuffer::with_capacity(initial);
        let mut model = VecDeque::new();

        for op in &ops {
            match op {
                Op::Push(bytes) => {
                    let before = ring.capacity();
                    ring.push(bytes).unwrap();
                    model.extend(bytes.iter().copied());
                    if ring.capacity() != before {
                        prop_assert!(ring.capacity() >= before * 2);
                    }
                }
                Op::Pop(len) => {
                    let mut output = vec![0u8; *len];
                    if *len > model.len() {
                        prop_assert_eq!(
                            ring.pop(&mut output),
                            Err(RingError::Underflow { requested: *len, available: model.len() })
                        );
                    } else {
                        ring.pop(&mut output).unwrap();
                        let expected: Vec<u8> = model.drain(..*len).collect();
                        prop_assert_eq!(output, expected);
                    }
                }
                Op::Peek(len) => {
                    let len = (*len).min(model.len());
                    let mut output = vec![0u8; len];
                    ring.peek(&mut output).unwrap();
                    let expected: Vec<u8> = model.iter().take(len).copied().collect();
                    prop_assert_eq!(output, expected);
                }
            }

            prop_assert!(ring.check_invariant());
            prop_assert_eq!(ring.len(), model.len());
            prop_assert!(ring.len() < ring.capacity());
        }

        let (front, back) = ring.as_slices();
        let remaining: Vec<u8> = front.iter().chain(back).copied().collect();
        prop_assert_eq!(remaining, model.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn prop_chunking_does_not_change_order(
        data in prop::collection::vec(any::<u8>(), 0..4000),
        push_sizes in prop::collection::vec(1usize..500, 1..50),
        pop_sizes in prop::collection::vec(1usize..500, 1..50),
    ) {
        let mut ring = RingBuffer::new();

        let mut offset = 0;
        for size in push_sizes.iter().cycle() {
            if offset == data.len() {
                break;
            }
            let end = (offset + size).min(data.len());
            ring.push(&data[offset..end]).unwrap();
            offset = end;
        }

        let mut popped = Vec::with_capacity(data.len());
        for size in pop_sizes.iter().cycle() {
            if ring.is_empty() {
                break;
            }
            let mut output = vec![0u8; (*size).min(ring.len())];
            ring.pop(&mut output).unwrap();
            popped.extend_from_slice(&output);
        }

        prop_assert_eq!(popped, data);
        prop_assert!(ring.is_empty());
    }

    #[test]
    fn prop_wraparound_keeps_capacity(
        chunk in 1usize..31,
        rounds in 50usize..500,
    ) {
        let mut ring = RingBuffer::with_capacity(32);
        let mut counter = 0u8;

        for _ in 0..rounds {
            let bytes: Vec<u8> = (0..chunk).map(|_| { counter = counter.wrapping_add(1); counter }).collect();
            ring.push(&bytes).unwrap();

            let mut output = vec![0u8; chunk];
            ring.pop(&mut output).unwrap();
            prop_assert_eq!(output, bytes);
        }

        prop_assert_eq!(ring.capacity(), 32);
        prop_assert!(ring.is_empty());
    }
}
