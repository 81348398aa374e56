//! The owned, allocator-backed buffer shared by every container.
//!
//! [`RawBuf`] only manages memory: it knows its capacity and its allocator,
//! but not which slots are initialized. Containers track their live region
//! themselves and are responsible for dropping elements.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr::NonNull;

use crate::allocator::Allocator;
use crate::error::{Error, Result};

/// A contiguous block of `capacity` possibly-uninitialized `T` slots.
pub(crate) struct RawBuf<T, A: Allocator> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    elem: PhantomData<T>,
}

// `RawBuf` owns its elements like a `Box<[T]>` would.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuf<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuf<T, A> {}

#[inline]
fn array_layout<T>(cap: usize) -> Result<Layout> {
    Layout::array::<T>(cap).map_err(|_| Error::CapacityOverflow)
}

impl<T, A: Allocator> RawBuf<T, A> {
    /// Allocates room for `cap` elements from `alloc`.
    pub(crate) fn try_with_capacity_in(cap: usize, alloc: A) -> Result<Self> {
        let layout = array_layout::<T>(cap)?;
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            alloc.allocate(layout)?.cast()
        };

        Ok(RawBuf {
            ptr,
            cap,
            alloc,
            elem: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to the slot at position `index`.
    ///
    /// The slot may not be initialized.
    #[inline]
    pub(crate) fn ptr_at(&self, index: usize) -> *const T {
        debug_assert!(index <= self.cap);
        self.as_ptr().wrapping_add(index)
    }

    /// Returns a mutable pointer to the slot at position `index`.
    ///
    /// The slot may not be initialized.
    #[inline]
    pub(crate) fn mut_ptr_at(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.cap);
        self.as_mut_ptr().wrapping_add(index)
    }

    /// Changes the capacity to `new_cap`, preserving the content of the first
    /// `min(capacity, new_cap)` slots.
    ///
    /// On failure the buffer is left untouched.
    pub(crate) fn try_resize(&mut self, new_cap: usize) -> Result<()> {
        if new_cap == self.cap {
            return Ok(());
        }

        let new_layout = array_layout::<T>(new_cap)?;
        let old_layout = array_layout::<T>(self.cap)?;

        log::trace!(
            "resizing buffer of {}-byte elements: {} -> {} slots",
            size_of::<T>(),
            self.cap,
            new_cap
        );

        if new_layout.size() == 0 || old_layout.size() == 0 {
            if old_layout.size() != 0 {
                unsafe { self.alloc.deallocate(self.ptr.cast(), old_layout) };
                self.ptr = NonNull::dangling();
            } else if new_layout.size() != 0 {
                self.ptr = self.alloc.allocate(new_layout)?.cast();
            }
        } else {
            let ptr = unsafe {
                self.alloc
                    .reallocate(self.ptr.cast(), old_layout, new_layout.size())?
            };
            self.ptr = ptr.cast();
        }

        self.cap = new_cap;
        Ok(())
    }

    /// Doubles the capacity (from zero to one).
    pub(crate) fn try_grow(&mut self) -> Result<()> {
        let new_cap = match self.cap {
            0 => 1,
            cap => cap.checked_mul(2).ok_or(Error::CapacityOverflow)?,
        };
        self.try_resize(new_cap)
    }

    /// Halves the capacity if fewer than a quarter of the slots are in use.
    ///
    /// Shrinking is opportunistic: if the allocator refuses, the larger
    /// buffer is kept.
    pub(crate) fn shrink_if_sparse(&mut self, len: usize) {
        if len < self.cap / 4 {
            if let Err(e) = self.try_resize(self.cap / 2) {
                log::warn!("keeping buffer of {} slots, shrink refused: {}", self.cap, e);
            }
        }
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        if let Ok(layout) = array_layout::<T>(self.cap) {
            if layout.size() != 0 {
                unsafe { self.alloc.deallocate(self.ptr.cast(), layout) };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Global;

    #[test]
    fn growth_doubles_from_zero() {
        let mut buf = RawBuf::<u32, _>::try_with_capacity_in(0, Global).unwrap();
        let mut seen = alloc::vec::Vec::new();
        for _ in 0..5 {
            buf.try_grow().unwrap();
            seen.push(buf.capacity());
        }
        assert_eq!(seen, [1, 2, 4, 8, 16]);
    }

    #[test]
    fn shrinking_waits_for_quarter_occupancy() {
        let mut buf = RawBuf::<u32, _>::try_with_capacity_in(16, Global).unwrap();
        buf.shrink_if_sparse(4);
        assert_eq!(buf.capacity(), 16);
        buf.shrink_if_sparse(3);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn resizing_keeps_prefix() {
        let mut buf = RawBuf::<u64, _>::try_with_capacity_in(4, Global).unwrap();
        for i in 0..4 {
            unsafe { buf.mut_ptr_at(i).write(i as u64 * 3) };
        }
        buf.try_resize(64).unwrap();
        buf.try_resize(2).unwrap();
        for i in 0..2 {
            assert_eq!(unsafe { buf.ptr_at(i).read() }, i as u64 * 3);
        }
    }

    #[test]
    fn zero_sized_elements_never_touch_the_allocator() {
        let mut buf = RawBuf::<(), _>::try_with_capacity_in(8, Global).unwrap();
        buf.try_grow().unwrap();
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn oversized_requests_report_overflow() {
        let result = RawBuf::<u64, _>::try_with_capacity_in(usize::MAX, Global);
        assert!(matches!(result, Err(Error::CapacityOverflow)));
    }
}
