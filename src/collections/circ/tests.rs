#![cfg(test)]

use super::*;
use crate::util::panic::assert_panics;

fn ring(cap: usize) -> ByteRing {
    ByteRing::with_cap(cap).expect("Small rings should be allocatable.")
}

#[test]
fn test_construction() {
    assert_eq!(
        ByteRing::with_cap(0).map(|_| ()),
        Err(NewError::ZeroCapacity(ZeroCapacity)),
        "A capacity of zero should be rejected."
    );

    let ring = ByteRing::new().expect("The default capacity should be allocatable.");
    assert_eq!(ring.cap(), DEFAULT_CAP);
    assert_eq!(ring.len(), 0);
    assert!(ring.is_empty());
    assert_eq!(ring.free(), DEFAULT_CAP);

    assert!(
        ByteRing::with_cap(isize::MAX as usize + 1)
            .unwrap_err()
            .is_capacity_overflow(),
        "Capacities beyond isize::MAX can't be laid out."
    );
}

#[test]
fn test_example_scenario() {
    let mut ring = ring(4);

    ring.append(&[1, 2, 3]).expect("Append within capacity can't fail.");
    assert_eq!(ring.len(), 3);

    ring.append(&[4, 5]).expect("Append should grow the ring.");
    assert!(ring.cap() >= 5, "3 + 2 > 4, so the ring should have grown.");
    assert_eq!(ring.len(), 5);

    assert_eq!(ring.take_next(2), [1, 2]);
    assert_eq!(ring.len(), 3);
    assert_eq!(ring.take_last(1), [5]);
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.take_next(2), [3, 4]);
    assert!(ring.is_empty());
}

#[test]
fn test_fifo_and_lifo() {
    let data: Vec<u8> = (0..100).collect();

    let mut ring = ring(16);
    ring.append(&data).expect("Append should grow the ring.");
    let mut out = [0; 128];
    assert_eq!(ring.get_next(&mut out), 100);
    assert_eq!(&out[..100], &data[..], "Bytes should come out in the order they went in.");
    assert!(ring.is_empty());

    ring.append(&data).expect("Append should grow the ring.");
    assert_eq!(ring.get_last(&mut out), 100);
    assert_eq!(
        &out[..100], &data[..],
        "Bytes taken from the back should still be in order."
    );
    assert!(ring.is_empty());
}

#[test]
fn test_prepend_ordering() {
    let mut ring = ring(2);
    ring.prepend_byte(b'c').expect("Prepend within capacity can't fail.");
    ring.prepend_byte(b'b').expect("Prepend within capacity can't fail.");
    ring.prepend_byte(b'a').expect("Prepend should grow the ring.");
    assert_eq!(ring.take_next(3), b"abc");

    ring.append(b"world").expect("Append should grow the ring.");
    ring.prepend(b"hello ").expect("Prepend should grow the ring.");
    assert_eq!(
        ring.take_next(usize::MAX),
        b"hello world",
        "Prepended slices should keep their internal order."
    );
}

#[test]
fn test_wraparound() {
    let mut ring = ring(8);
    let mut expected = vec![0];
    let mut actual = Vec::new();
    ring.append_byte(0).expect("Append within capacity can't fail.");

    // One byte always stays behind, so head moves forward by 3 every round and crosses the end of
    // the storage several times.
    let mut next = 1_u8;
    for _ in 0..20 {
        let chunk = [next, next.wrapping_add(1), next.wrapping_add(2)];
        next = next.wrapping_add(3);
        expected.extend_from_slice(&chunk);
        ring.append(&chunk).expect("Append within capacity can't fail.");
        actual.extend(ring.take_next(3));
    }
    assert_eq!(ring.cap(), 8, "Growth shouldn't have been needed.");

    actual.extend(ring.take_next(usize::MAX));
    assert_eq!(actual, expected, "No bytes should be corrupted at the wrap boundary.");
}

#[test]
fn test_growth_preserves_data() {
    let mut ring = ring(4);
    ring.append(&[0, 9]).expect("Append within capacity can't fail.");
    ring.skip_next(1);
    // Head is now mid-storage, so this wraps.
    ring.append(&[1, 2, 3]).expect("Append within capacity can't fail.");
    assert_eq!(ring.free(), 0);
    assert!(!ring.as_slices().1.is_empty(), "Contents should wrap before growing.");

    ring.append_byte(5).expect("Append should grow the ring.");
    assert!(ring.cap() > 4, "Ring should have grown.");
    assert!(ring.as_slices().1.is_empty(), "Growing should linearize the contents.");
    assert_eq!(ring.take_next(usize::MAX), [9, 1, 2, 3, 5]);
}

#[test]
fn test_growth_policy() {
    let mut ring = ring(4);
    ring.append(&[0; 5]).expect("Append should grow the ring.");
    assert_eq!(ring.cap(), 8, "Small overflows should double the capacity.");

    ring.append(&[0; 100]).expect("Append should grow the ring.");
    assert_eq!(ring.cap(), 105, "Large writes should grow to exactly the required size.");

    assert_eq!(
        ring.reserve(usize::MAX),
        Err(AllocError::CapacityOverflow(CapacityOverflow)),
        "Overflowing the required length should be reported."
    );
    assert_eq!(ring.len(), 105, "A failed reserve shouldn't change the ring.");
    assert_eq!(ring.cap(), 105, "A failed reserve shouldn't change the ring.");

    ring.reserve(10).expect("Reserve should grow the ring.");
    assert!(ring.free() >= 10);
}

#[test]
fn test_defragment() {
    let mut ring = ring(6);
    ring.append(&[0, 0, 0, 0, 1]).expect("Append within capacity can't fail.");
    ring.skip_next(4);
    ring.append(&[2, 3, 4, 5]).expect("Append within capacity can't fail.");
    let wrapped = ring.as_slices();
    assert_eq!(wrapped, (&[1, 2][..], &[3, 4, 5][..]));

    ring.defragment();
    assert_eq!(ring.as_slices(), (&[1, 2, 3, 4, 5][..], &[][..]));
    assert_eq!(ring.len(), 5, "Defragmenting shouldn't change the length.");

    ring.defragment();
    assert_eq!(
        ring.make_contiguous(),
        &[1, 2, 3, 4, 5],
        "Defragmenting twice should change nothing."
    );
    assert_eq!(ring.take_next(usize::MAX), [1, 2, 3, 4, 5]);
}

#[test]
fn test_empty_extraction() {
    let mut ring = ring(4);
    let mut buf = [0; 4];
    assert_eq!(ring.get_next(&mut buf), 0);
    assert_eq!(ring.get_last(&mut buf), 0);
    assert_eq!(ring.peek_next(&mut buf), 0);
    assert_eq!(ring.get_next_byte(), None);
    assert_eq!(ring.get_last_byte(), None);
    assert_eq!(ring.take_next(10), Vec::<u8>::new());
    assert_eq!(ring.skip_last(10), 0);

    ring.append(&[1]).expect("Append within capacity can't fail.");
    assert_eq!(ring.get_next(&mut []), 0, "A zero length read should take nothing.");
    assert_eq!(ring.len(), 1);
}

#[test]
fn test_peek_and_skip() {
    let mut ring = ring(8);
    ring.append(b"abcdef").expect("Append within capacity can't fail.");

    let mut buf = [0; 2];
    assert_eq!(ring.peek_next(&mut buf), 2);
    assert_eq!(&buf, b"ab");
    assert_eq!(ring.peek_last(&mut buf), 2);
    assert_eq!(&buf, b"ef");
    assert_eq!(ring.len(), 6, "Peeking shouldn't consume anything.");

    assert_eq!(ring.skip_next(1), 1);
    assert_eq!(ring.skip_last(1), 1);
    assert_eq!(ring.get_next_byte(), Some(b'b'));
    assert_eq!(ring.get_last_byte(), Some(b'e'));
    assert_eq!(ring.skip_next(100), 2, "Skipping should stop at the length.");
    assert!(ring.is_empty());
}

#[test]
fn test_indexing() {
    let mut ring = ring(4);
    ring.append(&[0, 0, 10]).expect("Append within capacity can't fail.");
    ring.skip_next(2);
    ring.append(&[20, 30]).expect("Append within capacity can't fail.");

    assert_eq!(ring[0], 10, "Indices should count from the front, not the storage.");
    assert_eq!(ring.get(2), Ok(30));
    assert_eq!(ring.get(3), Err(IndexOutOfBounds { index: 3, len: 3 }));

    ring[1] = 21;
    ring.set(2, 31).expect("Index 2 is in bounds.");
    assert_eq!(ring.set(3, 0), Err(IndexOutOfBounds { index: 3, len: 3 }));
    assert_eq!(ring.iter().collect::<Vec<_>>(), [10, 21, 31]);
    assert_eq!(ring.len(), 3, "Indexing shouldn't change the length.");

    assert_panics!({ ring[3] }, "index 3 out of bounds");
}

#[test]
fn test_clear() {
    let mut ring = ring(4);
    ring.append(&[0; 10]).expect("Append should grow the ring.");
    let grown = ring.cap();

    ring.clear(true);
    assert!(ring.is_empty());
    assert_eq!(ring.cap(), grown, "Clearing should keep capacity when asked to.");

    ring.append(&[1, 2]).expect("Append within capacity can't fail.");
    ring.clear(false);
    assert!(ring.is_empty());
    assert_eq!(ring.cap(), 4, "Clearing should restore the initial capacity.");

    ring.append(&[3]).expect("Append within capacity can't fail.");
    assert_eq!(ring.take_next(1), [3]);
}

#[test]
fn test_iter_equality_and_debug() {
    let mut a = ring(4);
    let mut b = ring(16);
    a.append(&[0, 0, 1]).expect("Append within capacity can't fail.");
    a.skip_next(2);
    a.append(&[2, 3]).expect("Append within capacity can't fail.");
    b.append(&[1, 2, 3]).expect("Append within capacity can't fail.");

    assert_eq!(a, b, "Equality should only depend on contents.");
    assert_eq!(a.iter().len(), 3);
    assert_eq!(a.iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!((&a).into_iter().sum::<u8>(), 6);

    assert_eq!(
        format!("{a:?}"),
        "ByteRing { contents: [1, 2, 3], len: 3, cap: 4 }"
    );
}

#[cfg(feature = "sync")]
mod sync {
    use std::sync::{Arc, mpsc};
    use std::thread;
    use std::time::Duration;

    use super::*;

    const THREADS: usize = 8;
    const APPENDS: usize = 200;
    const CHUNK: usize = 16;

    #[test]
    fn test_concurrent_appends() {
        let ring = Arc::new(RingBuffer::with_cap(8).expect("Small rings should be allocatable."));

        let handles: Vec<_> = (0..THREADS)
            .map(|id| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for _ in 0..APPENDS {
                        ring.append(&[id as u8; CHUNK]).expect("Append should grow the ring.");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Appending threads shouldn't panic.");
        }

        assert_eq!(ring.len(), THREADS * APPENDS * CHUNK);

        let contents = ring.take_next(usize::MAX);
        let mut per_thread = [0; THREADS];
        for chunk in contents.chunks(CHUNK) {
            assert!(
                chunk.iter().all(|b| *b == chunk[0]),
                "Appends from different threads shouldn't interleave."
            );
            per_thread[chunk[0] as usize] += 1;
        }
        assert_eq!(per_thread, [APPENDS; THREADS]);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_concurrent_producer_consumer() {
        let ring = Arc::new(RingBuffer::with_cap(4).expect("Small rings should be allocatable."));
        let total = 10_000_usize;

        let producer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                for i in 0..total {
                    ring.append_byte(i as u8).expect("Append should grow the ring.");
                }
            })
        };

        let mut received = Vec::with_capacity(total);
        let mut buf = [0; 64];
        while received.len() < total {
            let count = ring.get_next(&mut buf);
            received.extend_from_slice(&buf[..count]);
            if count == 0 {
                thread::yield_now();
            }
        }
        producer.join().expect("The producer shouldn't panic.");

        assert!(
            received.iter().enumerate().all(|(i, b)| *b == i as u8),
            "Bytes should arrive in the order they were produced."
        );
    }

    #[test]
    fn test_locked_composite() {
        let ring = RingBuffer::with_cap(8).expect("Small rings should be allocatable.");
        ring.append(b"abc").expect("Append within capacity can't fail.");

        {
            let _guard = ring.lock();
            let mut buf = [0; 1];
            ring.peek_next(&mut buf);
            if buf[0] == b'a' {
                ring.skip_next(1);
                ring.prepend(b"A").expect("Prepend within capacity can't fail.");
            }
        }

        assert_eq!(ring.get(0), Ok(b'A'));
        assert_eq!(ring.set(5, 0), Err(IndexOutOfBounds { index: 5, len: 3 }));
        ring.defragment();
        ring.clear(false);
        assert!(ring.is_empty());
        assert_eq!(ring.cap(), 8);
        assert!(format!("{ring:?}").starts_with("RingBuffer { inner: ByteRing"));
        assert_eq!(ring.into_inner().len(), 0);
    }

    #[test]
    fn test_reentry_while_locked() {
        let ring = Arc::new(RingBuffer::with_cap(4).expect("Small rings should be allocatable."));
        let (sender, receiver) = mpsc::channel();

        let worker = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let _guard = ring.lock();
                let _nested = ring.lock();
                ring.append(b"xyz").expect("Append should grow the ring.");
                let len = ring.len();
                let taken = ring.take_next(2);
                let debug = format!("{ring:?}");
                sender.send((len, taken, debug)).expect("The receiver outlives the worker.");
            })
        };

        let (len, taken, debug) = receiver
            .recv_timeout(Duration::from_secs(3))
            .expect("Calling back in while holding the lock shouldn't deadlock.");
        worker.join().expect("The worker shouldn't panic.");

        assert_eq!(len, 3);
        assert_eq!(taken, b"xy");
        assert_eq!(
            debug,
            "RingBuffer { inner: ByteRing { contents: [122], len: 1, cap: 4 } }"
        );
        assert_eq!(ring.take_next(usize::MAX), b"z");
    }

    #[test]
    fn test_guard_excludes_other_threads() {
        let ring = Arc::new(RingBuffer::with_cap(4).expect("Small rings should be allocatable."));
        ring.append(b"a").expect("Append within capacity can't fail.");

        let guard = ring.lock();
        let writer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.append(b"b").expect("Append within capacity can't fail."))
        };
        thread::sleep(Duration::from_millis(50));
        assert_eq!(ring.len(), 1, "Other threads shouldn't write while the guard is held.");
        drop(guard);

        writer.join().expect("The writer shouldn't panic.");
        assert_eq!(ring.take_next(usize::MAX), b"ab");
    }
}
