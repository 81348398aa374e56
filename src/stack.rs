//! A last-in, first-out stack over a growable buffer.

use core::fmt;

use crate::allocator::{Allocator, Global};
use crate::error::Result;
use crate::storage::RawBuf;

/// A LIFO stack that doubles its capacity when full and halves it when
/// less than a quarter of it is in use.
///
/// # Examples
/// ```
/// let mut stack = growable::Stack::new();
/// stack.push('a');
/// stack.push('b');
/// assert_eq!(stack.peek(), Some(&'b'));
/// assert_eq!(stack.pop(), Some('b'));
/// assert_eq!(stack.pop(), Some('a'));
/// assert_eq!(stack.pop(), None);
/// ```
pub struct Stack<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    len: usize,
}

impl<T> Stack<T> {
    /// Constructs a new, empty stack without allocating.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty stack with room for `capacity` elements.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Stack<T, A> {
    /// Constructs a new, empty stack allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(stack) => stack,
            Err(e) => e.abort(),
        }
    }

    /// Constructs a new, empty stack allocating out of `alloc`, returning an
    /// error instead of aborting if the initial allocation fails.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Stack {
            buf: RawBuf::try_with_capacity_in(capacity, alloc)?,
            len: 0,
        })
    }

    /// Returns the number of elements the stack can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the stack contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the live elements, bottom to top.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { core::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Pushes an element onto the stack, returning `Err(value)` if the
    /// allocator cannot provide room for it.
    pub fn try_push(&mut self, value: T) -> core::result::Result<(), T> {
        if self.len == self.buf.capacity() && self.buf.try_grow().is_err() {
            return Err(value);
        }

        unsafe { self.buf.mut_ptr_at(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Pushes an element onto the stack, doubling its capacity first if it
    /// is full.
    ///
    /// # Panics
    /// Aborts on allocation failure. See [`try_push`](Stack::try_push) for
    /// a checked version.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        if self.len == self.buf.capacity() {
            if let Err(e) = self.buf.try_grow() {
                e.abort();
            }
        }

        unsafe { self.buf.mut_ptr_at(self.len).write(value) };
        self.len += 1;
    }

    /// Removes the top element and returns it, or [`None`] if the stack is
    /// empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let value = unsafe { self.buf.ptr_at(self.len).read() };
        self.buf.shrink_if_sparse(self.len);
        Some(value)
    }

    /// Returns a reference to the top element, or [`None`] if the stack is empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns a mutable reference to the top element, or [`None`] if the
    /// stack is empty.
    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        let len = self.len;
        let slice = unsafe { core::slice::from_raw_parts_mut(self.buf.as_mut_ptr(), len) };
        slice.last_mut()
    }

    /// Drops every element, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        unsafe {
            let live = core::ptr::slice_from_raw_parts_mut(self.buf.as_mut_ptr(), len);
            core::ptr::drop_in_place(live);
        }
    }
}

impl<T, A: Allocator> Drop for Stack<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Stack<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, A: Allocator> Extend<T> for Stack<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push(item));
    }
}
