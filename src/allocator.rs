//! The allocation interface every container goes through.
//!
//! An [`Allocator`] hands out untyped blocks of memory described by a
//! [`Layout`]. Containers never call the global allocator directly; they are
//! generic over `A: Allocator` and default to [`Global`], which forwards to
//! the process heap. An [`Arena`](crate::arena::Arena) can be substituted by
//! passing `&arena` to any `*_in` constructor.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::error::{Error, Result};

/// A source of memory for the containers in this crate.
///
/// # Safety
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and that stay valid
/// until passed to [`deallocate`](Allocator::deallocate) or
/// [`reallocate`](Allocator::reallocate) of the same allocator.
///
/// Callers never pass zero-sized layouts.
pub unsafe trait Allocator {
    /// Allocates a block fitting `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Resizes the block at `ptr` to `new_size` bytes, keeping its alignment
    /// and the first `min(old_layout.size(), new_size)` bytes of its content.
    ///
    /// On failure, the original block is left untouched.
    ///
    /// # Safety
    /// `ptr` must denote a block currently allocated by this allocator with
    /// `old_layout`, and `new_size` must be non-zero.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>>;

    /// Releases the block at `ptr`.
    ///
    /// # Safety
    /// `ptr` must denote a block currently allocated by this allocator with
    /// `layout`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>> {
        (**self).reallocate(ptr, old_layout, new_size)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

/// The process heap, as exposed by [`alloc::alloc`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        debug_assert!(layout.size() != 0);
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| Error::alloc_failure(layout))
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>> {
        debug_assert!(new_size != 0);
        let new_layout = Layout::from_size_align(new_size, old_layout.align())
            .map_err(|_| Error::CapacityOverflow)?;
        let new_ptr = alloc::alloc::realloc(ptr.as_ptr(), old_layout, new_size);
        NonNull::new(new_ptr).ok_or_else(|| Error::alloc_failure(new_layout))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        alloc::alloc::dealloc(ptr.as_ptr(), layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_round_trips_content_through_reallocation() {
        let layout = Layout::array::<u32>(4).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        unsafe {
            let words = ptr.as_ptr().cast::<u32>();
            for i in 0..4 {
                words.add(i).write(i as u32 * 10);
            }

            let grown = Global.reallocate(ptr, layout, 16 * 4).unwrap();
            let words = grown.as_ptr().cast::<u32>();
            for i in 0..4 {
                assert_eq!(words.add(i).read(), i as u32 * 10);
            }

            Global.deallocate(grown, Layout::array::<u32>(16).unwrap());
        }
    }

    #[test]
    fn references_forward_to_the_allocator() {
        let by_ref = &Global;
        let layout = Layout::new::<u64>();
        let ptr = by_ref.allocate(layout).unwrap();
        unsafe { by_ref.deallocate(ptr, layout) };
    }
}
