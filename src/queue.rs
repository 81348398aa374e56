//! A first-in, first-out queue implemented with a growable ring buffer.
//!
//! Both [`push`](Queue::push) and [`pop`](Queue::pop) are O(1) (push is
//! amortized). Elements are not necessarily contiguous in memory; use
//! [`as_slices`](Queue::as_slices) to view them as two slices in FIFO order.

use core::fmt::{self, Debug, Formatter};
use core::iter::FusedIterator;
use core::ptr;

use crate::allocator::{Allocator, Global};
use crate::error::Result;
use crate::storage::RawBuf;

/// A FIFO queue implemented with a ring buffer that doubles its capacity
/// when full.
///
/// Unlike [`Vector`](crate::Vector) and [`Stack`](crate::Stack), the queue
/// never gives memory back while it is alive.
pub struct Queue<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    start: usize,
    len: usize,
}

impl<T> Queue<T> {
    /// Constructs a new, empty queue without allocating.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty queue with room for `capacity` elements.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Queue<T, A> {
    /// Constructs a new, empty queue allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(queue) => queue,
            Err(e) => e.abort(),
        }
    }

    /// Constructs a new, empty queue allocating out of `alloc`, returning an
    /// error instead of aborting if the initial allocation fails.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Queue {
            buf: RawBuf::try_with_capacity_in(capacity, alloc)?,
            start: 0,
            len: 0,
        })
    }

    /// Returns the number of elements the queue can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next push will reallocate.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.capacity()
    }

    #[inline]
    fn physical_index(&self, index: usize) -> usize {
        let cap = self.buf.capacity();
        let idx = self.start + index;
        if idx >= cap {
            idx - cap
        } else {
            idx
        }
    }

    /// Doubles the capacity, then makes the live region contiguous again if
    /// it wrapped around the end of the old buffer.
    fn try_grow(&mut self) -> Result<()> {
        let old_cap = self.buf.capacity();
        self.buf.try_grow()?;

        // full, so `end == start`; any `start > 0` means [0, end) holds the
        // tail of the queue, which now goes right after the old buffer's end
        let end = self.start;
        if end > 0 {
            unsafe {
                let base = self.buf.as_mut_ptr();
                ptr::copy_nonoverlapping(base, base.add(old_cap), end);
            }
        }

        Ok(())
    }

    /// Appends an element to the back of the queue, returning `Err(value)`
    /// if the allocator cannot provide room for it.
    ///
    /// # Examples
    /// ```
    /// use core::mem::MaybeUninit;
    /// use growable::{Arena, Queue};
    ///
    /// let mut backing_region = [MaybeUninit::uninit(); 8];
    /// let arena = Arena::from_buffer(&mut backing_region[..]);
    /// let mut queue = Queue::with_capacity_in(4, &arena);
    /// for i in 0..4u8 {
    ///     assert!(queue.try_push(i).is_ok());
    /// }
    /// let _blocker = Queue::<u8, _>::with_capacity_in(4, &arena);
    /// assert_eq!(queue.try_push(4), Err(4));
    /// ```
    pub fn try_push(&mut self, value: T) -> core::result::Result<(), T> {
        if self.is_full() && self.try_grow().is_err() {
            return Err(value);
        }

        let end = self.physical_index(self.len);
        unsafe { self.buf.mut_ptr_at(end).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Appends an element to the back of the queue, doubling its capacity
    /// first if it is full.
    ///
    /// # Panics
    /// Aborts on allocation failure. See [`try_push`](Queue::try_push) for
    /// a checked version.
    ///
    /// # Examples
    /// ```
    /// let mut queue = growable::Queue::with_capacity(2);
    /// queue.push(1);
    /// queue.push(2);
    /// assert_eq!(queue.pop(), Some(1));
    /// queue.push(3);
    /// queue.push(4);
    /// assert_eq!(queue.capacity(), 4);
    /// assert_eq!(queue.pop(), Some(2));
    /// assert_eq!(queue.pop(), Some(3));
    /// assert_eq!(queue.pop(), Some(4));
    /// ```
    #[track_caller]
    pub fn push(&mut self, value: T) {
        if self.is_full() {
            if let Err(e) = self.try_grow() {
                e.abort();
            }
        }

        let end = self.physical_index(self.len);
        unsafe { self.buf.mut_ptr_at(end).write(value) };
        self.len += 1;
    }

    /// Removes the element at the front of the queue and returns it, or
    /// [`None`] if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let result = unsafe { self.buf.ptr_at(self.start).read() };
        self.start = self.physical_index(1);
        self.len -= 1;
        Some(result)
    }

    /// Returns a reference to the element at the front of the queue, or
    /// [`None`] if the queue is empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        unsafe { self.buf.ptr_at(self.start).as_ref() }
    }

    /// Returns a mutable reference to the element at the front of the queue,
    /// or [`None`] if the queue is empty.
    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        let start = self.start;
        unsafe { self.buf.mut_ptr_at(start).as_mut() }
    }

    /// Returns a pair of slices which contain, in FIFO order, the contents
    /// of the queue.
    ///
    /// # Examples
    /// ```
    /// let mut queue = growable::Queue::with_capacity(3);
    /// queue.push(1); queue.push(2); queue.push(3);
    /// queue.pop();
    /// queue.push(4);
    /// assert_eq!(queue.as_slices(), (&[2, 3][..], &[4][..]));
    /// ```
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let cap = self.buf.capacity();
        let back = self.start + self.len;
        let ptr = self.buf.as_ptr();
        if back <= cap {
            let slice =
                unsafe { core::slice::from_raw_parts(ptr.wrapping_add(self.start), self.len) };
            (slice, &[])
        } else {
            let fst = unsafe { core::slice::from_raw_parts(ptr.add(self.start), cap - self.start) };
            let snd = unsafe { core::slice::from_raw_parts(ptr, back - cap) };
            (fst, snd)
        }
    }

    /// Returns an iterator over the queue in FIFO order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        Iter {
            front: front.iter(),
            back: back.iter(),
        }
    }

    /// Drops every element, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
        self.start = 0;
    }
}

impl<T, A: Allocator> Drop for Queue<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Debug, A: Allocator> Debug for Queue<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator> Extend<T> for Queue<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push(item));
    }
}

impl<T> core::iter::FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut result = Queue::with_capacity(iter.size_hint().0);
        result.extend(iter);
        result
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Queue<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of a queue, front to back.
///
/// This `struct` is created by the [`iter`](Queue::iter) method on [`Queue`].
pub struct Iter<'a, T> {
    front: core::slice::Iter<'a, T>,
    back: core::slice::Iter<'a, T>,
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter")
            .field(&self.front.as_slice())
            .field(&self.back.as_slice())
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.front.next().or_else(|| self.back.next())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.front.len() + self.back.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        self.back.next_back().or_else(|| self.front.next_back())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use core::cell::Cell;

    #[test]
    fn hello_world_through_capacity_one() {
        let mut queue = Queue::with_capacity(1);
        queue.push(String::from("Hello"));
        assert_eq!(queue.pop().as_deref(), Some("Hello"));
        assert!(queue.is_empty());

        queue.push(String::from("Hello"));
        queue.push(String::from("World"));
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.pop().as_deref(), Some("Hello"));
        assert_eq!(queue.pop().as_deref(), Some("World"));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn growth_after_wraparound_keeps_fifo_order() {
        let mut queue = Queue::with_capacity(4);
        queue.extend(0..4);
        assert_eq!(queue.pop(), Some(0));
        queue.push(4);
        assert_eq!(queue.as_slices(), (&[1, 2, 3][..], &[4][..]));

        // start > 0 and full: this forces the relocation
        queue.push(5);
        assert_eq!(queue.capacity(), 8);
        assert_eq!(queue.as_slices(), (&[1, 2, 3, 4, 5][..], &[][..]));
        queue.push(6);

        let drained: alloc::vec::Vec<_> = core::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(drained, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn repeated_wraparound_growth() {
        let mut queue = Queue::new();
        let mut model = alloc::collections::VecDeque::new();
        let mut next = 0u32;
        for round in 0..200 {
            for _ in 0..(round % 7 + 2) {
                queue.push(next);
                model.push_back(next);
                next += 1;
            }
            for _ in 0..(round % 5 + 1) {
                assert_eq!(queue.pop(), model.pop_front());
            }
            assert_eq!(queue.peek(), model.front());
            assert!(queue.iter().eq(model.iter()));
        }
    }

    #[test]
    fn no_shrink_on_underuse() {
        let mut queue = Queue::new();
        queue.extend(0..64);
        while queue.pop().is_some() {}
        assert_eq!(queue.capacity(), 64);
    }

    #[test]
    fn iter_both_ends() {
        let mut queue = Queue::with_capacity(4);
        queue.extend([1, 2, 3, 4].iter().copied());
        queue.pop();
        queue.pop();
        queue.push(5);
        let mut iter = queue.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), None);
        assert_eq!(alloc::format!("{:?}", queue), "[3, 4, 5]");
    }

    #[test]
    fn drops_live_elements() {
        struct Droppable<'a>(&'a Cell<usize>);
        impl Drop for Droppable<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drop_count = Cell::new(0);
        let mut queue = Queue::with_capacity(3);
        for _ in 0..3 {
            queue.push(Droppable(&drop_count));
        }
        drop(queue.pop());
        queue.push(Droppable(&drop_count));
        assert_eq!(drop_count.get(), 1);

        drop(queue);
        assert_eq!(drop_count.get(), 4);

        let mut queue = Queue::with_capacity(2);
        queue.push(Droppable(&drop_count));
        queue.push(Droppable(&drop_count));
        queue.clear();
        assert_eq!(drop_count.get(), 6);
        assert!(queue.is_empty());
    }
}
