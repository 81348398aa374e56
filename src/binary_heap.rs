//! A growable priority queue implemented with a binary heap.
//!
//! Insertion and popping the first element have O(log(n)) time complexity.
//! Checking the first element is O(1). Converting a vector to a binary heap
//! can be done in-place, and has O(n) complexity.
//!
//! Which element comes first is decided by the heap's comparator: an element
//! ordered [`Less`](core::cmp::Ordering::Less) is closer to the root. With
//! the default [`Natural`] comparator this is a min-heap; wrap it in
//! [`Reverse`](crate::cmp::Reverse) for a max-heap.

use core::fmt;
use core::iter::FusedIterator;

use crate::allocator::{Allocator, Global};
use crate::cmp::{Compare, Natural};
use crate::error::Result;
use crate::vec::{self, Vector};

/// A growable priority queue implemented with a binary heap.
///
/// # Examples
/// ```
/// let mut heap = growable::BinaryHeap::new();
/// heap.push(3);
/// heap.push(10);
/// heap.push(1);
/// heap.push(4);
///
/// assert_eq!(heap.peek(), Some(&1));
/// let order: Vec<_> = heap.drain_sorted().collect();
/// assert_eq!(order, [1, 3, 4, 10]);
/// ```
pub struct BinaryHeap<T, C = Natural, A: Allocator = Global> {
    a: Vector<T, C, A>,
}

// These utility functions for binary tree traversal use 0-based indexing,
// i.e. they are `PARENT(i + 1) - 1`, `LEFT(i + 1) - 1` and `RIGHT(i + 1) - 1`
// of the usual 1-based formulation.
#[inline(always)]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline(always)]
fn left(i: usize) -> usize {
    2 * i + 1
}

#[inline(always)]
fn right(i: usize) -> usize {
    2 * i + 2
}

fn sift_up<T, C: Compare<T> + ?Sized>(a: &mut [T], cmp: &C, mut i: usize) {
    while i > 0 && cmp.compare(&a[i], &a[parent(i)]).is_lt() {
        a.swap(i, parent(i));
        i = parent(i);
    }
}

fn sift_down<T, C: Compare<T> + ?Sized>(a: &mut [T], cmp: &C, mut i: usize) {
    loop {
        let l = left(i);
        if l >= a.len() {
            return;
        }

        let r = right(i);
        let first = if r < a.len() && cmp.compare(&a[r], &a[l]).is_lt() { r } else { l };
        if !cmp.compare(&a[first], &a[i]).is_lt() {
            return;
        }

        a.swap(i, first);
        i = first;
    }
}

impl<T> BinaryHeap<T> {
    /// Constructs a new, empty min-heap without allocating.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty min-heap with room for `capacity` elements.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        BinaryHeap { a: Vector::with_capacity(capacity) }
    }
}

impl<T> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> BinaryHeap<T, C> {
    /// Constructs a new, empty heap ordered by `cmp`.
    #[inline]
    #[track_caller]
    pub fn with_comparator(capacity: usize, cmp: C) -> Self {
        BinaryHeap { a: Vector::with_comparator(capacity, cmp) }
    }
}

impl<T, A: Allocator> BinaryHeap<T, Natural, A> {
    /// Constructs a new, empty min-heap allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        BinaryHeap { a: Vector::with_capacity_in(capacity, alloc) }
    }

    /// Constructs a new, empty min-heap allocating out of `alloc`, returning
    /// an error instead of aborting if the initial allocation fails.
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(BinaryHeap { a: Vector::try_with_capacity_in(capacity, alloc)? })
    }
}

impl<T, C, A: Allocator> BinaryHeap<T, C, A> {
    /// Constructs a new, empty heap ordered by `cmp` and allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_comparator_in(capacity: usize, cmp: C, alloc: A) -> Self {
        BinaryHeap { a: Vector::with_comparator_in(capacity, cmp, alloc) }
    }

    /// Fallible version of [`with_comparator_in`](BinaryHeap::with_comparator_in).
    #[inline]
    pub fn try_with_comparator_in(capacity: usize, cmp: C, alloc: A) -> Result<Self> {
        Ok(BinaryHeap { a: Vector::try_with_comparator_in(capacity, cmp, alloc)? })
    }

    /// Returns a reference to the first item in the binary heap, or [`None`] if it is empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.a.first()
    }

    /// Returns the number of elements the binary heap can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.a.capacity()
    }

    /// Returns the number of elements in the binary heap, also referred to as its 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns `true` if the binary heap contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Returns a reference to the comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        self.a.comparator()
    }

    /// Returns an iterator visiting all values in the underlying vector in arbitrary order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.a.iter()
    }

    /// Drops all items from the binary heap.
    #[inline]
    pub fn clear(&mut self) {
        self.a.clear();
    }

    /// Consumes the `BinaryHeap` and returns the underlying vector in arbitrary order.
    #[inline]
    pub fn into_vector(self) -> Vector<T, C, A> {
        self.a
    }
}

impl<T, C: Compare<T>, A: Allocator> BinaryHeap<T, C, A> {
    /// Pushes an item onto the binary heap, returning `Err(item)` if the
    /// allocator cannot provide room for it.
    pub fn try_push(&mut self, item: T) -> core::result::Result<(), T> {
        self.a.try_push(item)?;
        let (a, cmp) = self.a.split_mut();
        let last = a.len() - 1;
        sift_up(a, cmp, last);
        Ok(())
    }

    /// Pushes an item onto the binary heap, growing it first if it is full.
    ///
    /// # Panics
    /// Aborts on allocation failure. See [`try_push`](BinaryHeap::try_push)
    /// for a checked version.
    #[track_caller]
    pub fn push(&mut self, item: T) {
        self.a.push(item);
        let (a, cmp) = self.a.split_mut();
        let last = a.len() - 1;
        sift_up(a, cmp, last);
    }

    /// Removes the first element from the binary heap and returns it, or
    /// [`None`] if it is empty.
    ///
    /// Halves the capacity if fewer than a quarter of the slots stay in use.
    ///
    /// # Examples
    /// ```
    /// use growable::{BinaryHeap, Vector};
    /// let mut vec = Vector::new();
    /// vec.push(3); vec.push(1);
    ///
    /// let mut heap = BinaryHeap::from(vec);
    ///
    /// assert_eq!(heap.pop(), Some(1));
    /// assert_eq!(heap.pop(), Some(3));
    /// assert_eq!(heap.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        let last = self.a.len().checked_sub(1)?;
        self.a.swap(0, last);
        let result = self.a.pop();

        let (a, cmp) = self.a.split_mut();
        sift_down(a, cmp, 0);
        result
    }

    /// Returns an iterator which retrieves elements in heap order.
    /// The retrieved elements are removed from the original heap.
    /// The remaining elements will be removed on drop in heap order.
    ///
    /// # Examples
    /// ```
    /// let mut heap = growable::BinaryHeap::new();
    /// heap.extend([5, 1, 3].iter().copied());
    ///
    /// let mut iter = heap.drain_sorted();
    /// assert_eq!(iter.next(), Some(1));
    /// drop(iter);
    /// assert!(heap.is_empty());
    /// ```
    #[inline]
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, T, C, A> {
        DrainSorted { heap: self }
    }
}

impl<T, C: Compare<T>, A: Allocator> From<Vector<T, C, A>> for BinaryHeap<T, C, A> {
    /// Converts a [`Vector`] into a binary heap ordered by the vector's comparator.
    ///
    /// This conversion happens in-place, and has O(n) time complexity.
    fn from(mut vec: Vector<T, C, A>) -> Self {
        let (a, cmp) = vec.split_mut();
        for i in (0..(a.len() / 2)).rev() {
            sift_down(a, cmp, i);
        }
        BinaryHeap { a: vec }
    }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for BinaryHeap<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone, C: Clone, A: Allocator + Clone> Clone for BinaryHeap<T, C, A> {
    fn clone(&self) -> Self {
        BinaryHeap { a: self.a.clone() }
    }
}

impl<T, C: Compare<T>, A: Allocator> Extend<T> for BinaryHeap<T, C, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push(item));
    }
}

impl<T, C, A: Allocator> IntoIterator for BinaryHeap<T, C, A> {
    type Item = T;
    type IntoIter = vec::IntoIterator<T, A>;
    fn into_iter(self) -> Self::IntoIter {
        self.a.into_iter()
    }
}

/// A draining iterator over the elements of a `BinaryHeap`.
///
/// This `struct` is created by [`BinaryHeap::drain_sorted()`].
/// See its documentation for more.
pub struct DrainSorted<'a, T, C: Compare<T>, A: Allocator> {
    heap: &'a mut BinaryHeap<T, C, A>,
}

impl<T, C: Compare<T>, A: Allocator> Iterator for DrainSorted<'_, T, C, A> {
    type Item = T;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.heap.len();
        (size, Some(size))
    }

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop()
    }
}

impl<T, C: Compare<T>, A: Allocator> ExactSizeIterator for DrainSorted<'_, T, C, A> {}
impl<T, C: Compare<T>, A: Allocator> FusedIterator for DrainSorted<'_, T, C, A> {}

impl<T, C: Compare<T>, A: Allocator> Drop for DrainSorted<'_, T, C, A> {
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::Reverse;
    use alloc::vec::Vec;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn tree_traversal_utilities() {
        assert_eq!(left(0), 1);
        assert_eq!(right(0), 2);
        assert_eq!(parent(1), 0);
        assert_eq!(parent(2), 0);

        for i in 1..=1000 {
            let l = left(i);
            let r = right(i);
            assert_eq!(l + 1, r);
            assert_eq!(parent(l), i);
            assert_eq!(parent(r), i);

            let ll = left(l);
            let lr = right(l);
            let rl = left(r);
            let rr = right(r);

            assert_eq!(ll + 1, lr);
            assert_eq!(rl + 1, rr);
            assert_eq!(parent(parent(ll)), i);
            assert_eq!(parent(parent(lr)), i);
            assert_eq!(parent(parent(rl)), i);
            assert_eq!(parent(parent(rr)), i);
        }
    }

    fn assert_heap_property<T, C: Compare<T>, A: Allocator>(heap: &BinaryHeap<T, C, A>) {
        let a = heap.a.as_slice();
        for i in 1..a.len() {
            assert!(!heap.comparator().compare(&a[i], &a[parent(i)]).is_lt());
        }
    }

    #[test]
    fn pops_in_order_for_any_input_shape() {
        let mut rng = SmallRng::seed_from_u64(0x5432_1012_3454_3210);
        let inputs: [Vec<i32>; 4] = [
            (0..500).collect(),
            (0..500).rev().collect(),
            (0..500).map(|i| i % 4).collect(),
            (0..500).map(|_| rng.gen_range(-100..100)).collect(),
        ];

        for input in inputs.iter() {
            let mut heap = BinaryHeap::new();
            for &x in input {
                heap.push(x);
                assert_heap_property(&heap);
            }

            let mut expected = input.clone();
            expected.sort();
            let mut popped = Vec::new();
            while let Some(x) = heap.pop() {
                popped.push(x);
            }
            assert_eq!(popped, expected);
        }
    }

    #[test]
    fn reverse_comparator_gives_max_heap() {
        let mut heap = BinaryHeap::with_comparator(0, Reverse(Natural));
        heap.extend([3, 10, 1, 4].iter().copied());
        assert_eq!(heap.peek(), Some(&10));
        let order: Vec<_> = heap.drain_sorted().collect();
        assert_eq!(order, [10, 4, 3, 1]);
    }

    #[test]
    fn heapify_from_vector() {
        let mut vec = Vector::with_comparator(0, |a: &&str, b: &&str| a.len().cmp(&b.len()));
        vec.extend(["three", "a", "four", "xx", "seven!!"].iter().copied());

        let mut heap = BinaryHeap::from(vec);
        assert_heap_property(&heap);
        assert_eq!(heap.pop(), Some("a"));
        assert_eq!(heap.pop(), Some("xx"));
        assert_eq!(heap.into_vector().len(), 3);
    }

    #[test]
    fn pop_shrinks_capacity() {
        let mut heap = BinaryHeap::with_capacity(64);
        heap.extend(0..64);
        while heap.len() > 16 {
            heap.pop();
        }
        assert_eq!(heap.capacity(), 64);
        heap.pop();
        assert_eq!(heap.capacity(), 32);
        assert_heap_property(&heap);
        assert_eq!(heap.peek(), Some(&49));
    }

    #[test]
    fn drain_sorted_drops_remaining_on_drop() {
        let mut heap = BinaryHeap::new();
        heap.extend((0..10).rev());
        {
            let mut drain = heap.drain_sorted();
            assert_eq!(drain.len(), 10);
            assert_eq!(drain.next(), Some(0));
        }
        assert!(heap.is_empty());
    }
}
