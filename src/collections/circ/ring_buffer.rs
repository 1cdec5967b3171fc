use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::byte_ring::ByteRing;
use super::error::{AllocError, IndexOutOfBounds, NewError};

/// A thread-safe [`ByteRing`], for sharing a byte queue between a producer and consumer (or
/// several of each).
///
/// Every method takes the internal lock for the whole operation, so each call is indivisible with
/// respect to every other call. There is no reader/writer distinction. The lock is reentrant: to
/// make a sequence of operations indivisible, hold a [`RingGuard`] from [`RingBuffer::lock`] and
/// keep calling methods on the RingBuffer from the same thread.
///
/// Nothing here blocks waiting for data or space: reads return immediately with whatever is
/// available and writes grow the storage instead.
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use std::thread;
/// # use stdkit::collections::circ::RingBuffer;
/// let ring = Arc::new(RingBuffer::with_cap(16).unwrap());
///
/// let producer = {
///     let ring = Arc::clone(&ring);
///     thread::spawn(move || ring.append(b"ping").unwrap())
/// };
/// producer.join().unwrap();
///
/// assert_eq!(ring.take_next(4), b"ping");
/// ```
pub struct RingBuffer {
    inner: ReentrantMutex<RefCell<ByteRing>>,
}

/// Holds the lock of a [`RingBuffer`] until dropped. Other threads block on every method of the
/// RingBuffer in the meantime, while the thread holding the guard can keep using it.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct RingGuard<'a> {
    _guard: ReentrantMutexGuard<'a, RefCell<ByteRing>>,
}

impl RingBuffer {
    /// Creates a new, empty RingBuffer with a capacity of
    /// [`DEFAULT_CAP`](super::DEFAULT_CAP).
    ///
    /// # Errors
    /// Returns an error if the initial allocation fails.
    pub fn new() -> Result<RingBuffer, NewError> {
        Ok(RingBuffer::from(ByteRing::new()?))
    }

    /// Creates a new, empty RingBuffer with capacity exactly equal to `cap`.
    ///
    /// # Errors
    /// See [`ByteRing::with_cap`].
    pub fn with_cap(cap: usize) -> Result<RingBuffer, NewError> {
        Ok(RingBuffer::from(ByteRing::with_cap(cap)?))
    }

    /// Acquires the lock, keeping it held until the returned guard is dropped. The same thread can
    /// call any method on the RingBuffer while holding the guard, including `lock` again.
    ///
    /// # Deadlocks
    /// Other threads calling into the RingBuffer block until the guard is dropped, so waiting on
    /// one of them while holding the guard deadlocks.
    ///
    /// # Examples
    /// ```
    /// # use stdkit::collections::circ::RingBuffer;
    /// let ring = RingBuffer::with_cap(8).unwrap();
    /// ring.append(b"key=value").unwrap();
    ///
    /// // Consume everything up to and including the '=' without anyone else reading in between.
    /// let guard = ring.lock();
    /// let mut peeked = vec![0; ring.len()];
    /// ring.peek_next(&mut peeked);
    /// let split = peeked.iter().position(|b| *b == b'=').unwrap();
    /// let key = ring.take_next(split);
    /// ring.skip_next(1);
    /// drop(guard);
    ///
    /// assert_eq!(key, b"key");
    /// assert_eq!(ring.take_next(usize::MAX), b"value");
    /// ```
    pub fn lock(&self) -> RingGuard<'_> {
        RingGuard {
            _guard: self.inner.lock(),
        }
    }

    /// Runs `f` on the underlying [`ByteRing`] with the lock held. `f` only ever calls into the
    /// ByteRing, so the mutable borrow can't be taken twice.
    fn with<R>(&self, f: impl FnOnce(&mut ByteRing) -> R) -> R {
        let guard = self.inner.lock();
        let mut ring = guard.borrow_mut();
        f(&mut ring)
    }

    /// Consumes the RingBuffer, returning the underlying [`ByteRing`].
    pub fn into_inner(self) -> ByteRing {
        self.inner.into_inner().into_inner()
    }

    /// Returns a snapshot of the number of bytes in the RingBuffer.
    pub fn len(&self) -> usize {
        self.with(|ring| ring.len())
    }

    /// Returns true if the RingBuffer contained no bytes at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.with(|ring| ring.is_empty())
    }

    /// Returns a snapshot of the capacity of the RingBuffer.
    pub fn cap(&self) -> usize {
        self.with(|ring| ring.cap())
    }

    /// Returns a snapshot of the free space in the RingBuffer.
    pub fn free(&self) -> usize {
        self.with(|ring| ring.free())
    }

    /// See [`ByteRing::append`].
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the buffer needed to grow and couldn't, without writing
    /// anything.
    pub fn append(&self, data: &[u8]) -> Result<(), AllocError> {
        self.with(|ring| ring.append(data))
    }

    /// See [`ByteRing::append_byte`].
    ///
    /// # Errors
    /// See [`RingBuffer::append`].
    pub fn append_byte(&self, byte: u8) -> Result<(), AllocError> {
        self.with(|ring| ring.append_byte(byte))
    }

    /// See [`ByteRing::prepend`].
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the buffer needed to grow and couldn't, without writing
    /// anything.
    pub fn prepend(&self, data: &[u8]) -> Result<(), AllocError> {
        self.with(|ring| ring.prepend(data))
    }

    /// See [`ByteRing::prepend_byte`].
    ///
    /// # Errors
    /// See [`RingBuffer::prepend`].
    pub fn prepend_byte(&self, byte: u8) -> Result<(), AllocError> {
        self.with(|ring| ring.prepend_byte(byte))
    }

    /// See [`ByteRing::get_next`].
    pub fn get_next(&self, buf: &mut [u8]) -> usize {
        self.with(|ring| ring.get_next(buf))
    }

    /// See [`ByteRing::get_next_byte`].
    pub fn get_next_byte(&self) -> Option<u8> {
        self.with(|ring| ring.get_next_byte())
    }

    /// See [`ByteRing::get_last`].
    pub fn get_last(&self, buf: &mut [u8]) -> usize {
        self.with(|ring| ring.get_last(buf))
    }

    /// See [`ByteRing::get_last_byte`].
    pub fn get_last_byte(&self) -> Option<u8> {
        self.with(|ring| ring.get_last_byte())
    }

    /// See [`ByteRing::take_next`].
    pub fn take_next(&self, limit: usize) -> Vec<u8> {
        self.with(|ring| ring.take_next(limit))
    }

    /// See [`ByteRing::take_last`].
    pub fn take_last(&self, limit: usize) -> Vec<u8> {
        self.with(|ring| ring.take_last(limit))
    }

    /// See [`ByteRing::peek_next`].
    pub fn peek_next(&self, buf: &mut [u8]) -> usize {
        self.with(|ring| ring.peek_next(buf))
    }

    /// See [`ByteRing::peek_last`].
    pub fn peek_last(&self, buf: &mut [u8]) -> usize {
        self.with(|ring| ring.peek_last(buf))
    }

    /// See [`ByteRing::skip_next`].
    pub fn skip_next(&self, count: usize) -> usize {
        self.with(|ring| ring.skip_next(count))
    }

    /// See [`ByteRing::skip_last`].
    pub fn skip_last(&self, count: usize) -> usize {
        self.with(|ring| ring.skip_last(count))
    }

    /// See [`ByteRing::get`].
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` is not less than the length at the time of the call.
    pub fn get(&self, index: usize) -> Result<u8, IndexOutOfBounds> {
        self.with(|ring| ring.get(index))
    }

    /// See [`ByteRing::set`].
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` is not less than the length at the time of the call.
    pub fn set(&self, index: usize, byte: u8) -> Result<(), IndexOutOfBounds> {
        self.with(|ring| ring.set(index, byte))
    }

    /// See [`ByteRing::reserve`].
    ///
    /// # Errors
    /// See [`ByteRing::reserve`].
    pub fn reserve(&self, extra: usize) -> Result<(), AllocError> {
        self.with(|ring| ring.reserve(extra))
    }

    /// See [`ByteRing::defragment`].
    pub fn defragment(&self) {
        self.with(|ring| ring.defragment())
    }

    /// See [`ByteRing::clear`].
    pub fn clear(&self, keep_cap: bool) {
        self.with(|ring| ring.clear(keep_cap))
    }
}

impl From<ByteRing> for RingBuffer {
    fn from(value: ByteRing) -> Self {
        RingBuffer {
            inner: ReentrantMutex::new(RefCell::new(value)),
        }
    }
}

impl Debug for RingBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let guard = self.inner.try_lock();
        match guard.as_ref().and_then(|guard| guard.try_borrow().ok()) {
            Some(ring) => f.debug_struct("RingBuffer").field("inner", &*ring).finish(),
            None => f.debug_struct("RingBuffer").field("inner", &"<locked>").finish(),
        }
    }
}
