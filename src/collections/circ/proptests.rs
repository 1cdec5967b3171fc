#![cfg(test)]

use std::collections::VecDeque;

use proptest::prelude::*;

use super::*;

#[derive(Debug, Clone)]
enum Op {
    Append(Vec<u8>),
    Prepend(Vec<u8>),
    GetNext(usize),
    GetLast(usize),
    PeekNext(usize),
    SkipLast(usize),
    Set(usize, u8),
    Reserve(usize),
    Defragment,
    Clear(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::Append),
        2 => prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::Prepend),
        3 => (0_usize..32).prop_map(Op::GetNext),
        2 => (0_usize..32).prop_map(Op::GetLast),
        1 => (0_usize..32).prop_map(Op::PeekNext),
        1 => (0_usize..8).prop_map(Op::SkipLast),
        1 => (0_usize..40, any::<u8>()).prop_map(|(i, b)| Op::Set(i, b)),
        1 => (0_usize..64).prop_map(Op::Reserve),
        1 => Just(Op::Defragment),
        1 => any::<bool>().prop_map(Op::Clear),
    ]
}

/// Applies `op` to both the ring and a [`VecDeque`] model, checking that they agree on everything
/// observable.
fn apply(ring: &mut ByteRing, model: &mut VecDeque<u8>, op: Op) -> Result<(), TestCaseError> {
    match op {
        Op::Append(data) => {
            ring.append(&data)?;
            model.extend(&data);
        },
        Op::Prepend(data) => {
            ring.prepend(&data)?;
            for byte in data.into_iter().rev() {
                model.push_front(byte);
            }
        },
        Op::GetNext(n) => {
            let mut buf = vec![0; n];
            let count = ring.get_next(&mut buf);
            let taken = n.min(model.len());
            let expected: Vec<u8> = model.drain(..taken).collect();
            prop_assert_eq!(&buf[..count], &expected[..]);
        },
        Op::GetLast(n) => {
            let mut buf = vec![0; n];
            let count = ring.get_last(&mut buf);
            let start = model.len() - n.min(model.len());
            let expected: Vec<u8> = model.drain(start..).collect();
            prop_assert_eq!(&buf[..count], &expected[..]);
        },
        Op::PeekNext(n) => {
            let mut buf = vec![0; n];
            let count = ring.peek_next(&mut buf);
            let expected: Vec<u8> = model.iter().take(n).copied().collect();
            prop_assert_eq!(&buf[..count], &expected[..]);
        },
        Op::SkipLast(n) => {
            let count = ring.skip_last(n);
            prop_assert_eq!(count, n.min(model.len()));
            model.truncate(model.len() - count);
        },
        Op::Set(index, byte) => match model.get_mut(index) {
            Some(slot) => {
                ring.set(index, byte)?;
                *slot = byte;
            },
            None => {
                prop_assert!(ring.set(index, byte).is_err());
            },
        },
        Op::Reserve(extra) => {
            ring.reserve(extra)?;
            prop_assert!(ring.free() >= extra);
        },
        Op::Defragment => {
            ring.defragment();
            prop_assert!(ring.as_slices().1.is_empty());
        },
        Op::Clear(keep_cap) => {
            ring.clear(keep_cap);
            model.clear();
        },
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_matches_deque_model(cap in 1_usize..16, ops in prop::collection::vec(op(), 0..64)) {
        let mut ring = ByteRing::with_cap(cap)?;
        let mut model = VecDeque::new();

        for op in ops {
            apply(&mut ring, &mut model, op)?;

            prop_assert!(ring.len() <= ring.cap(), "length must never exceed capacity");
            prop_assert_eq!(ring.len(), model.len());
            prop_assert!(ring.iter().eq(model.iter().copied()), "contents diverged from model");
        }
    }

    #[test]
    fn test_defragment_is_invisible(
        cap in 1_usize..16,
        skip in 0_usize..16,
        data in prop::collection::vec(any::<u8>(), 0..48),
    ) {
        let mut ring = ByteRing::with_cap(cap)?;
        ring.append(&data)?;
        ring.skip_next(skip);
        ring.append(&data)?;

        let mut copy = ByteRing::with_cap(cap)?;
        copy.append(&data)?;
        copy.skip_next(skip);
        copy.append(&data)?;
        copy.defragment();
        copy.defragment();

        prop_assert_eq!(copy.len(), ring.len());
        prop_assert_eq!(copy.take_next(usize::MAX), ring.take_next(usize::MAX));
    }
}
