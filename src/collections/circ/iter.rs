use std::fmt::{self, Debug, Formatter};
use std::iter::{Chain, Copied, FusedIterator};
use std::slice;

/// A borrowed iterator over the bytes of a [`ByteRing`](super::ByteRing), from front to back.
#[derive(Clone)]
pub struct Iter<'a> {
    inner: Chain<Copied<slice::Iter<'a, u8>>, Copied<slice::Iter<'a, u8>>>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(first: &'a [u8], second: &'a [u8]) -> Iter<'a> {
        Iter {
            inner: first.iter().copied().chain(second.iter().copied()),
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

// Chain can't implement ExactSizeIterator in general, but both halves here are slices so the size
// hint is always exact.
impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl Debug for Iter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
