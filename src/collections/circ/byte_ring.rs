use std::cmp;
use std::fmt::{self, Debug, Formatter};
use std::ops::{Index, IndexMut};

use tracing::{debug, trace, warn};

use super::error::{AllocError, CapacityOverflow, IndexOutOfBounds, NewError, ZeroCapacity};
use super::iter::Iter;
use super::storage::Storage;
use crate::util::result::ResultExtension;

/// The capacity used by [`ByteRing::new`].
pub const DEFAULT_CAP: usize = 1024;

const MAX_CAP: usize = isize::MAX as usize;

const GROWTH_FACTOR: usize = 2;

/// A growable circular buffer of bytes, which can be written to and consumed from either end.
///
/// Valid bytes occupy the circular range `head..head + len` of the underlying storage, wrapping
/// past the physical end when required. Writing more than the free space grows the storage, which
/// also lays the existing bytes out linearly again. The storage is never shrunk automatically.
///
/// Reads never wait for data. Reading from an empty ByteRing returns 0 bytes (or [`None`]).
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of bytes in the ByteRing.
/// - `m`: The number of bytes being written or read.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `get` / `set` | `O(1)` |
/// | `append` / `prepend` | `O(m)`*, `O(n+m)` |
/// | `get_next` / `get_last` | `O(m)` |
/// | `peek_next` / `peek_last` | `O(m)` |
/// | `skip_next` / `skip_last` | `O(1)` |
/// | `defragment` | `O(cap)`**, `O(1)` |
/// | `clear` | `O(1)` |
///
/// \* If the ByteRing doesn't have enough free space for the new bytes, it is grown in `O(n)`.
///
/// \** Already linear contents starting at offset 0 are left alone.
pub struct ByteRing {
    storage: Storage,
    head: usize,
    len: usize,
    initial_cap: usize,
}

impl ByteRing {
    /// Creates a new, empty ByteRing with a capacity of [`DEFAULT_CAP`].
    ///
    /// # Errors
    /// Returns an error if the initial allocation fails.
    pub fn new() -> Result<ByteRing, NewError> {
        ByteRing::with_cap(DEFAULT_CAP)
    }

    /// Creates a new, empty ByteRing with capacity exactly equal to `cap`. This is also the capacity
    /// restored by [`clear(false)`](ByteRing::clear).
    ///
    /// # Errors
    /// Returns [`ZeroCapacity`] if `cap` is 0, or an allocation error if the storage can't be
    /// allocated.
    ///
    /// # Examples
    /// ```
    /// # use stdkit::collections::circ::ByteRing;
    /// let ring = ByteRing::with_cap(5).unwrap();
    /// assert_eq!(ring.cap(), 5);
    /// assert!(ring.is_empty());
    ///
    /// assert!(ByteRing::with_cap(0).unwrap_err().is_zero_capacity());
    /// ```
    pub fn with_cap(cap: usize) -> Result<ByteRing, NewError> {
        if cap == 0 {
            return Err(ZeroCapacity.into());
        }

        Ok(ByteRing {
            storage: Storage::try_new(cap)?,
            head: 0,
            len: 0,
            initial_cap: cap,
        })
    }

    /// Returns the number of bytes in the ByteRing.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the ByteRing contains no bytes.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the ByteRing.
    pub const fn cap(&self) -> usize {
        self.storage.size()
    }

    /// Returns the number of bytes which can be written before the ByteRing has to grow.
    pub const fn free(&self) -> usize {
        self.cap() - self.len
    }

    /// Appends all of `data` to the back of the ByteRing, growing it if required.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the ByteRing needed to grow and couldn't. In that case, nothing
    /// is written.
    ///
    /// # Examples
    /// ```
    /// # use stdkit::collections::circ::ByteRing;
    /// let mut ring = ByteRing::with_cap(2).unwrap();
    /// ring.append(&[1, 2, 3]).unwrap();
    /// assert_eq!(ring.len(), 3);
    /// assert!(ring.cap() >= 3);
    /// ```
    pub fn append(&mut self, data: &[u8]) -> Result<(), AllocError> {
        if data.is_empty() {
            return Ok(());
        }

        self.reserve(data.len())?;

        let tail = self.wrap(self.head + self.len);
        self.write_at(tail, data);
        self.len += data.len();
        Ok(())
    }

    /// Appends a single byte to the back of the ByteRing.
    ///
    /// # Errors
    /// See [`ByteRing::append`].
    pub fn append_byte(&mut self, byte: u8) -> Result<(), AllocError> {
        self.append(&[byte])
    }

    /// Prepends all of `data` to the front of the ByteRing, growing it if required. `data` keeps its
    /// order, so it will be the next thing read by [`get_next`](ByteRing::get_next).
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the ByteRing needed to grow and couldn't. In that case, nothing
    /// is written.
    ///
    /// # Examples
    /// ```
    /// # use stdkit::collections::circ::ByteRing;
    /// let mut ring = ByteRing::with_cap(4).unwrap();
    /// ring.prepend(&[3]).unwrap();
    /// ring.prepend(&[2]).unwrap();
    /// ring.prepend(&[1]).unwrap();
    /// assert_eq!(ring.take_next(3), [1, 2, 3]);
    /// ```
    pub fn prepend(&mut self, data: &[u8]) -> Result<(), AllocError> {
        if data.is_empty() {
            return Ok(());
        }

        self.reserve(data.len())?;

        // The free space always sits directly before head, so moving head back by data.len() can't
        // overlap the existing bytes.
        let new_head = self.wrap(self.head + self.cap() - data.len());
        self.write_at(new_head, data);
        self.head = new_head;
        self.len += data.len();
        Ok(())
    }

    /// Prepends a single byte to the front of the ByteRing.
    ///
    /// # Errors
    /// See [`ByteRing::prepend`].
    pub fn prepend_byte(&mut self, byte: u8) -> Result<(), AllocError> {
        self.prepend(&[byte])
    }

    /// Moves up to `buf.len()` bytes from the front of the ByteRing into `buf`, returning the number
    /// of bytes moved.
    ///
    /// # Examples
    /// ```
    /// # use stdkit::collections::circ::ByteRing;
    /// let mut ring = ByteRing::with_cap(8).unwrap();
    /// ring.append(b"hello").unwrap();
    ///
    /// let mut buf = [0; 3];
    /// assert_eq!(ring.get_next(&mut buf), 3);
    /// assert_eq!(&buf, b"hel");
    /// assert_eq!(ring.get_next(&mut buf), 2);
    /// assert_eq!(&buf[..2], b"lo");
    /// assert_eq!(ring.get_next(&mut buf), 0);
    /// ```
    pub fn get_next(&mut self, buf: &mut [u8]) -> usize {
        let count = self.peek_next(buf);
        self.skip_next(count)
    }

    /// Removes and returns the byte at the front of the ByteRing, if there is one.
    pub fn get_next_byte(&mut self) -> Option<u8> {
        let mut buf = [0];
        (self.get_next(&mut buf) == 1).then_some(buf[0])
    }

    /// Moves up to `buf.len()` bytes from the back of the ByteRing into `buf`, returning the number
    /// of bytes moved. The bytes keep their order, so `buf` ends with the most recently appended
    /// byte.
    ///
    /// # Examples
    /// ```
    /// # use stdkit::collections::circ::ByteRing;
    /// let mut ring = ByteRing::with_cap(8).unwrap();
    /// ring.append(b"hello").unwrap();
    ///
    /// let mut buf = [0; 3];
    /// assert_eq!(ring.get_last(&mut buf), 3);
    /// assert_eq!(&buf, b"llo");
    /// assert_eq!(ring.len(), 2);
    /// ```
    pub fn get_last(&mut self, buf: &mut [u8]) -> usize {
        let count = self.peek_last(buf);
        self.skip_last(count)
    }

    /// Removes and returns the byte at the back of the ByteRing, if there is one.
    pub fn get_last_byte(&mut self) -> Option<u8> {
        let mut buf = [0];
        (self.get_last(&mut buf) == 1).then_some(buf[0])
    }

    /// Removes up to `limit` bytes from the front of the ByteRing, returning them in a new [`Vec`].
    pub fn take_next(&mut self, limit: usize) -> Vec<u8> {
        let mut out = vec![0; cmp::min(limit, self.len)];
        self.get_next(&mut out);
        out
    }

    /// Removes up to `limit` bytes from the back of the ByteRing, returning them in order in a new
    /// [`Vec`].
    pub fn take_last(&mut self, limit: usize) -> Vec<u8> {
        let mut out = vec![0; cmp::min(limit, self.len)];
        self.get_last(&mut out);
        out
    }

    /// Copies up to `buf.len()` bytes from the front of the ByteRing into `buf` without removing
    /// them, returning the number of bytes copied.
    pub fn peek_next(&self, buf: &mut [u8]) -> usize {
        let count = cmp::min(buf.len(), self.len);
        self.read_at(self.head, &mut buf[..count]);
        count
    }

    /// Copies up to `buf.len()` bytes from the back of the ByteRing into `buf` without removing
    /// them, returning the number of bytes copied.
    pub fn peek_last(&self, buf: &mut [u8]) -> usize {
        let count = cmp::min(buf.len(), self.len);
        self.read_at(self.wrap(self.head + self.len - count), &mut buf[..count]);
        count
    }

    /// Discards up to `count` bytes from the front of the ByteRing, returning the number discarded.
    pub fn skip_next(&mut self, count: usize) -> usize {
        let count = cmp::min(count, self.len);
        self.head = self.wrap(self.head + count);
        self.len -= count;
        if self.len == 0 {
            self.head = 0;
        }
        count
    }

    /// Discards up to `count` bytes from the back of the ByteRing, returning the number discarded.
    pub fn skip_last(&mut self, count: usize) -> usize {
        let count = cmp::min(count, self.len);
        self.len -= count;
        if self.len == 0 {
            self.head = 0;
        }
        count
    }

    /// Returns the byte at logical position `index`, counting from the front.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<u8, IndexOutOfBounds> {
        let offset = self.offset_of(index)?;
        Ok(self.storage[offset])
    }

    /// Overwrites the byte at logical position `index`, counting from the front.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn set(&mut self, index: usize, byte: u8) -> Result<(), IndexOutOfBounds> {
        let offset = self.offset_of(index)?;
        self.storage[offset] = byte;
        Ok(())
    }

    /// Ensures that the ByteRing can hold an additional `extra` bytes without growing. After a
    /// successful call, [`free`](ByteRing::free) will be `>= extra`.
    ///
    /// # Errors
    /// Returns [`CapacityOverflow`] if the required capacity exceeds [`isize::MAX`], or
    /// [`OutOfMemory`](super::OutOfMemory) if the allocation fails. The ByteRing is unchanged on
    /// failure.
    pub fn reserve(&mut self, extra: usize) -> Result<(), AllocError> {
        let required = self.len.checked_add(extra).ok_or(CapacityOverflow)?;
        if required <= self.cap() {
            return Ok(());
        }
        if required > MAX_CAP {
            return Err(CapacityOverflow.into());
        }

        let new_cap = cmp::max(self.cap().saturating_mul(GROWTH_FACTOR), required).min(MAX_CAP);
        trace!(old_cap = self.cap(), new_cap, len = self.len, "growing ring storage");
        self.realloc_linear(new_cap)
    }

    /// Rewrites the storage so that the bytes start at offset 0 without wrapping. Doesn't change the
    /// contents or length of the ByteRing.
    pub fn defragment(&mut self) {
        if self.head == 0 {
            return;
        }

        // The valid range is circular within the whole storage, so rotating the whole storage
        // keeps it in order.
        self.storage.rotate_left(self.head);
        self.head = 0;
    }

    /// Defragments the ByteRing and returns its contents as a single mutable slice.
    pub fn make_contiguous(&mut self) -> &mut [u8] {
        self.defragment();
        &mut self.storage[..self.len]
    }

    /// Returns the contents of the ByteRing as two slices, which, concatenated, hold the bytes in
    /// order. The second slice is empty unless the contents wrap.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let first_len = cmp::min(self.len, self.cap() - self.head);
        (
            &self.storage[self.head..self.head + first_len],
            &self.storage[..self.len - first_len],
        )
    }

    /// Returns an iterator over the bytes in the ByteRing, from front to back.
    pub fn iter(&self) -> Iter<'_> {
        let (first, second) = self.as_slices();
        Iter::new(first, second)
    }

    /// Removes all bytes from the ByteRing. If `keep_cap` is false, the capacity is also reset to
    /// the value that the ByteRing was created with.
    pub fn clear(&mut self, keep_cap: bool) {
        self.head = 0;
        self.len = 0;

        if keep_cap || self.cap() == self.initial_cap {
            return;
        }

        match Storage::try_new(self.initial_cap) {
            Ok(storage) => {
                debug!(old_cap = self.cap(), new_cap = self.initial_cap, "resetting ring storage");
                self.storage = storage;
            },
            Err(error) => warn!(%error, cap = self.cap(), "keeping ring storage after clear"),
        }
    }

    /// Maps a physical offset in `0..2 * cap` back into the storage.
    const fn wrap(&self, offset: usize) -> usize {
        let cap = self.cap();
        if offset >= cap { offset - cap } else { offset }
    }

    fn offset_of(&self, index: usize) -> Result<usize, IndexOutOfBounds> {
        if index >= self.len {
            return Err(IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(self.wrap(self.head + index))
    }

    /// Copies `data` into storage starting at `offset`, wrapping at most once. `data` must fit in
    /// the storage.
    fn write_at(&mut self, offset: usize, data: &[u8]) {
        let first = cmp::min(data.len(), self.cap() - offset);
        let (front, back) = data.split_at(first);
        self.storage[offset..offset + first].copy_from_slice(front);
        self.storage[..back.len()].copy_from_slice(back);
    }

    /// Copies bytes out of storage starting at `offset` until `buf` is full, wrapping at most once.
    fn read_at(&self, offset: usize, buf: &mut [u8]) {
        let first = cmp::min(buf.len(), self.cap() - offset);
        let (front, back) = buf.split_at_mut(first);
        front.copy_from_slice(&self.storage[offset..offset + first]);
        back.copy_from_slice(&self.storage[..back.len()]);
    }

    /// Moves the contents into a new allocation of `new_cap` bytes, starting at offset 0. The old
    /// storage is only released once the new one exists.
    fn realloc_linear(&mut self, new_cap: usize) -> Result<(), AllocError> {
        let mut storage = Storage::try_new(new_cap)?;
        let (first, second) = self.as_slices();
        storage[..first.len()].copy_from_slice(first);
        storage[first.len()..first.len() + second.len()].copy_from_slice(second);

        self.storage = storage;
        self.head = 0;
        Ok(())
    }
}

impl Index<usize> for ByteRing {
    type Output = u8;

    /// # Panics
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        let offset = self.offset_of(index).throw();
        &self.storage[offset]
    }
}

impl IndexMut<usize> for ByteRing {
    /// # Panics
    /// Panics if `index` is out of bounds.
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let offset = self.offset_of(index).throw();
        &mut self.storage[offset]
    }
}

impl<'a> IntoIterator for &'a ByteRing {
    type Item = u8;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for ByteRing {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for ByteRing {}

impl Debug for ByteRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRing")
            .field("contents", &self.iter())
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}
