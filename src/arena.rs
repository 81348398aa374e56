//! Arena-based memory management.
//!
//! An arena controls a contiguous region of memory, partitioning it by simply
//! incrementing a pointer. Memory handed out by an arena is not reclaimed
//! until the arena itself is dropped, with one exception: the most recent
//! allocation can be resized or released in place, which is exactly the
//! access pattern of a single growing container.
//!
//! Allocation goes through a shared reference, so several containers can
//! draw from the same arena at once:
//!
//! ```
//! use core::mem::MaybeUninit;
//! use growable::{Arena, Stack, Vector};
//!
//! let mut backing_region = [MaybeUninit::uninit(); 1024];
//! let arena = Arena::from_buffer(&mut backing_region[..]);
//!
//! let mut stack = Stack::with_capacity_in(4, &arena);
//! let mut vec = Vector::with_capacity_in(4, &arena);
//! stack.push(1u32);
//! vec.push(2u32);
//! assert_eq!(stack.peek(), Some(&1));
//! assert_eq!(vec.get(0), Some(&2));
//! ```
//!
//! An arena must live as long as the longest-living container inside it,
//! leaving the remainder of the region unusable to others. To mitigate this,
//! one can [construct an arena from an existing one](Arena::make_sub_arena),
//! which manages the remaining memory. It's not possible to allocate out of
//! the original arena as long as such a sub-arena lives, resulting in
//! stack-like behavior.

use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ops::Range;
use core::ptr::NonNull;

use crate::allocator::Allocator;
use crate::error::{Error, Result};

/// A memory arena, also known as a region-based allocator, or bump allocator.
///
/// See the [module-level documentation](crate::arena) for more.
pub struct Arena<'src> {
    cursor: Cell<*mut u8>,
    end: *mut u8,
    // Ensures you can't allocate out of the source arena while this one is still alive
    src: PhantomData<&'src mut [MaybeUninit<u8>]>,
}

impl<'src> From<&'src mut [MaybeUninit<u8>]> for Arena<'src> {
    fn from(buf: &'src mut [MaybeUninit<u8>]) -> Self {
        Arena::from_buffer(buf)
    }
}

impl<'src> Arena<'src> {
    /// Constructs a new `Arena` allocating out of `buf`.
    #[inline]
    pub fn from_buffer(buf: &'src mut [MaybeUninit<u8>]) -> Arena<'src> {
        let Range { start, end } = buf.as_mut_ptr_range();

        Arena {
            cursor: Cell::new(start.cast()),
            end: end.cast(),
            src: PhantomData,
        }
    }

    /// Constructs a new `Arena` allocating out of the free space remaining in `self`.
    /// `self` cannot be used for allocation until the new arena is dropped.
    ///
    /// # Examples
    /// ```
    /// use core::mem::MaybeUninit;
    /// use growable::{Arena, Vector};
    ///
    /// let mut backing_region = [MaybeUninit::uninit(); 256];
    /// let mut arena = Arena::from_buffer(&mut backing_region[..]);
    ///
    /// {
    ///     let tmp = arena.make_sub_arena();
    ///     // this takes up all 256 bytes...
    ///     let full = Vector::<u8, _, _>::try_with_capacity_in(256, &tmp);
    ///     assert!(full.is_ok());
    ///     // ...so this can't succeed
    ///     assert!(Vector::<u8, _, _>::try_with_capacity_in(1, &tmp).is_err());
    /// }
    ///
    /// // tmp was dropped, so the memory can be reused
    /// assert!(Vector::<u8, _, _>::try_with_capacity_in(256, &arena).is_ok());
    /// ```
    #[inline]
    pub fn make_sub_arena(&mut self) -> Arena<'_> {
        Arena {
            cursor: Cell::new(self.cursor.get()),
            end: self.end,
            src: PhantomData,
        }
    }

    /// Returns the number of bytes not yet handed out.
    ///
    /// Alignment padding may make less than this usable for a given layout.
    #[inline]
    pub fn remaining(&self) -> usize {
        (self.end as usize) - (self.cursor.get() as usize)
    }

    #[inline]
    fn try_alloc_raw(&self, layout: Layout) -> Option<NonNull<u8>> {
        let cursor = self.cursor.get();
        let align_offset = cursor.align_offset(layout.align());

        // `ptr::align_offset()` returns `usize::MAX` when aligning the pointer
        // isn't possible, which shouldn't ever happen with a `*u8`, BUT:
        // the implementation is free to _always_ return `usize::MAX`, so
        // the check stays in and is left to the optimizer.
        if align_offset == usize::MAX {
            return None;
        }

        // It's UB for the result of `ptr::add` to be out of bounds, so the
        // bounds check is done through usize arithmetic first:
        let total_bytes = align_offset.checked_add(layout.size())?;
        if self.remaining() < total_bytes {
            return None;
        }

        let result = unsafe { cursor.add(align_offset) };
        self.cursor.set(unsafe { result.add(layout.size()) });
        NonNull::new(result)
    }

    #[inline]
    fn is_last(&self, ptr: NonNull<u8>, size: usize) -> bool {
        (ptr.as_ptr() as usize).wrapping_add(size) == self.cursor.get() as usize
    }
}

unsafe impl Allocator for Arena<'_> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        self.try_alloc_raw(layout).ok_or_else(|| {
            log::debug!(
                "arena exhausted: requested {} bytes, {} remaining",
                layout.size(),
                self.remaining()
            );
            Error::alloc_failure(layout)
        })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>> {
        let new_layout = Layout::from_size_align(new_size, old_layout.align())
            .map_err(|_| Error::CapacityOverflow)?;

        if self.is_last(ptr, old_layout.size()) {
            let available = (self.end as usize) - (ptr.as_ptr() as usize);
            if new_size <= available {
                self.cursor.set(ptr.as_ptr().add(new_size));
                return Ok(ptr);
            }
        } else if new_size <= old_layout.size() {
            return Ok(ptr);
        }

        let new_ptr = self.allocate(new_layout)?;
        let count = old_layout.size().min(new_size);
        core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), count);
        Ok(new_ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if self.is_last(ptr, layout.size()) {
            self.cursor.set(ptr.as_ptr());
        }
    }
}

impl fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("remaining", &self.remaining())
            .finish()
    }
}
