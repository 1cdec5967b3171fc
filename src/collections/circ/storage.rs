use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use super::error::{AllocError, CapacityOverflow, OutOfMemory};

/// A fixed-size, heap allocated region of bytes. Similar to a `Box<[u8]>`, except that allocation
/// failure is reported to the caller instead of aborting.
///
/// All bytes are zeroed on allocation, so the whole region is always initialized and can be viewed
/// as a slice.
pub(crate) struct Storage {
    ptr: NonNull<u8>,
    size: usize,
}

impl Storage {
    /// Allocates a new, zeroed region of `size` bytes. A `size` of 0 doesn't allocate.
    ///
    /// # Errors
    /// Returns [`CapacityOverflow`] if `size` exceeds [`isize::MAX`] and [`OutOfMemory`] if the
    /// global allocator couldn't satisfy the request.
    pub(crate) fn try_new(size: usize) -> Result<Storage, AllocError> {
        let layout = Storage::make_layout(size)?;
        let ptr = Storage::make_ptr(layout)?;

        Ok(Storage {
            ptr,
            size,
        })
    }

    /// Returns the size of the region in bytes.
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    fn make_layout(size: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<u8>(size).map_err(|_| CapacityOverflow)
    }

    /// Returns a dangling pointer for a zero-sized layout.
    fn make_ptr(layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if layout.size() == 0 {
            Ok(NonNull::dangling())
        } else {
            // SAFETY: Zero-sized layouts have been guarded against.
            NonNull::new(unsafe { alloc::alloc_zeroed(layout) }).ok_or(OutOfMemory)
        }
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if self.size == 0 {
            return;
        }

        // SAFETY: The layout was valid when this Storage was allocated and size hasn't changed
        // since.
        let layout = unsafe { Layout::array::<u8>(self.size).unwrap_unchecked() };
        // SAFETY: ptr was allocated by the global allocator with this exact layout and is
        // deallocated only here, exactly once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) }
    }
}

impl Deref for Storage {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The pointer is nonnull and valid for size initialized bytes (all bytes are
        // zeroed on allocation). u8 has an alignment of 1 and the borrow checker prevents
        // mutation while the slice exists.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }
}

impl DerefMut for Storage {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As with deref, and the &mut self guarantees that this is the only live view of
        // the region.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

// SAFETY: Storage uniquely owns its allocation and holds plain bytes, so it can be moved between
// threads.
unsafe impl Send for Storage {}
// SAFETY: Shared access only ever produces &[u8]; mutation requires &mut self.
unsafe impl Sync for Storage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation() {
        let storage = Storage::try_new(16).expect("16 bytes should be allocatable");
        assert_eq!(storage.size(), 16);
        assert!(
            storage.iter().all(|b| *b == 0),
            "Fresh storage should be zeroed."
        );

        let empty = Storage::try_new(0).expect("Zero sized storage never allocates.");
        assert_eq!(&*empty, &[] as &[u8]);
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            Storage::try_new(isize::MAX as usize + 1).map(|_| ()),
            Err(AllocError::CapacityOverflow(CapacityOverflow)),
            "Sizes beyond isize::MAX should be rejected before reaching the allocator."
        );
    }
}
