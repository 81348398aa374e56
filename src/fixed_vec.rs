//! A contiguous array with a capacity fixed at construction.
//!
//! [`FixedVector`] allocates its buffer once and never reallocates: pushing
//! onto a full vector fails instead of growing it, and removals never give
//! memory back. Apart from that it behaves like a [`Vector`], with the same
//! comparator-driven [`min`](FixedVector::min), [`max`](FixedVector::max),
//! [`sort`](FixedVector::sort) and [`remove_item`](FixedVector::remove_item).

use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::allocator::{Allocator, Global};
use crate::cmp::{Compare, Natural};
use crate::error::Result;
use crate::vec::Vector;

/// A contiguous array type with constant capacity.
///
/// # Examples
/// ```
/// let mut vec = growable::FixedVector::with_capacity(2);
/// assert_eq!(vec.try_push(1), Ok(()));
/// assert_eq!(vec.try_push(2), Ok(()));
/// assert!(vec.is_full());
/// assert_eq!(vec.try_push(3), Err(3));
/// assert_eq!(vec.capacity(), 2);
/// ```
pub struct FixedVector<T, C = Natural, A: Allocator = Global> {
    a: Vector<T, C, A>,
}

impl<T> FixedVector<T> {
    /// Constructs a new, empty vector with room for exactly `capacity` elements.
    ///
    /// # Panics
    /// Aborts on allocation failure like the standard collections.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        FixedVector { a: Vector::with_capacity(capacity) }
    }
}

impl<T, C> FixedVector<T, C> {
    /// Constructs a new, empty vector ordered by `cmp`.
    #[inline]
    #[track_caller]
    pub fn with_comparator(capacity: usize, cmp: C) -> Self {
        FixedVector { a: Vector::with_comparator(capacity, cmp) }
    }
}

impl<T, A: Allocator> FixedVector<T, Natural, A> {
    /// Constructs a new, empty vector allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        FixedVector { a: Vector::with_capacity_in(capacity, alloc) }
    }

    /// Constructs a new, empty vector allocating out of `alloc`, returning
    /// an error instead of aborting if the allocation fails.
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(FixedVector { a: Vector::try_with_capacity_in(capacity, alloc)? })
    }
}

impl<T, C, A: Allocator> FixedVector<T, C, A> {
    /// Constructs a new, empty vector ordered by `cmp` and allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_comparator_in(capacity: usize, cmp: C, alloc: A) -> Self {
        FixedVector { a: Vector::with_comparator_in(capacity, cmp, alloc) }
    }

    /// Fallible version of [`with_comparator_in`](FixedVector::with_comparator_in).
    #[inline]
    pub fn try_with_comparator_in(capacity: usize, cmp: C, alloc: A) -> Result<Self> {
        Ok(FixedVector { a: Vector::try_with_comparator_in(capacity, cmp, alloc)? })
    }

    /// Returns the number of elements the vector can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.a.capacity()
    }

    /// Returns the number of elements in the vector, also referred to as its 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Returns `true` if the vector contains the maximum number of elements.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.a.is_full()
    }

    /// Returns a reference to the comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        self.a.comparator()
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.a.as_slice()
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.a.as_mut_slice()
    }

    /// Returns a reference to the element at the specified index, or [`None`]
    /// if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.a.get(index)
    }

    /// Returns a mutable reference to the element at the specified index, or
    /// [`None`] if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.a.get_mut(index)
    }

    /// Replaces the element at `index` with `value`, returning the old element.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.a.set(index, value)
    }

    /// Appends an element to the back of the vector, returning `Err(value)`
    /// if it is already at capacity.
    #[inline]
    pub fn try_push(&mut self, value: T) -> core::result::Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.a.try_push(value)
    }

    /// Appends an element to the back of the vector.
    ///
    /// # Panics
    /// Panics if the vector is already at capacity. See
    /// [`try_push`](FixedVector::try_push) for a checked version that never panics.
    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: T) {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed() -> ! {
            panic!("vector is already at capacity")
        }

        if self.try_push(value).is_err() {
            assert_failed();
        }
    }

    /// Removes the last element from the vector and returns it, or [`None`]
    /// if it is empty. The capacity is left unchanged.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.a.pop_in_place()
    }

    /// Removes and returns the element at position `index`, shifting all
    /// elements after it to the left. The capacity is left unchanged.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::FixedVector::with_capacity(3);
    /// vec.push("a"); vec.push("b"); vec.push("c");
    /// assert_eq!(vec.remove(1), Ok("b"));
    /// assert_eq!(vec.as_slice(), &["a", "c"]);
    /// assert!(vec.remove(2).is_err());
    /// ```
    #[inline]
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.a.remove_in_place(index)
    }

    /// Shortens the vector, keeping the first `len` elements and dropping the rest.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.a.truncate(len)
    }

    /// Clears the vector, dropping all values.
    #[inline]
    pub fn clear(&mut self) {
        self.a.clear()
    }

    /// Calls `f` on every element in index order.
    #[inline]
    pub fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.a.for_each(f)
    }

    /// Calls `f` on a mutable reference to every element in index order.
    #[inline]
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.a.for_each_mut(f)
    }
}

impl<T, C: Compare<T>, A: Allocator> FixedVector<T, C, A> {
    /// Returns the smallest element under the comparator, or [`None`] if
    /// the vector is empty. Of several equal minima, the first is returned.
    #[inline]
    pub fn min(&self) -> Option<&T> {
        self.a.min()
    }

    /// Returns the greatest element under the comparator, or [`None`] if
    /// the vector is empty. Of several equal maxima, the first is returned.
    #[inline]
    pub fn max(&self) -> Option<&T> {
        self.a.max()
    }

    /// Returns the index of the first element equal to `item` under the
    /// comparator.
    #[inline]
    pub fn position(&self, item: &T) -> Option<usize> {
        self.a.position(item)
    }

    /// Returns `true` if an element equal to `item` under the comparator is present.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.a.contains(item)
    }

    /// Removes and returns the first element equal to `item` under the
    /// comparator, or [`None`] if there is none.
    pub fn remove_item(&mut self, item: &T) -> Option<T> {
        let index = self.position(item)?;
        self.remove(index).ok()
    }

    /// Sorts the vector in place under its comparator.
    #[inline]
    pub fn sort(&mut self) {
        self.a.sort()
    }
}

impl<T, C, A: Allocator> Deref for FixedVector<T, C, A> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C, A: Allocator> DerefMut for FixedVector<T, C, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for FixedVector<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, C, A: Allocator> From<FixedVector<T, C, A>> for Vector<T, C, A> {
    /// Hands the elements over to a growable [`Vector`] without reallocating.
    #[inline]
    fn from(vec: FixedVector<T, C, A>) -> Self {
        vec.a
    }
}

impl<'a, T, C, A: Allocator> IntoIterator for &'a FixedVector<T, C, A> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, C, A: Allocator> IntoIterator for &'a mut FixedVector<T, C, A> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::error::Error;
    use core::mem::MaybeUninit;

    #[test]
    fn push_pop_get() {
        let mut vec = FixedVector::with_comparator(2, |a: &i32, b: &i32| a.cmp(b));
        vec.push(1);
        assert_eq!(vec.get(0), Some(&1));
        assert_eq!(vec.remove(0), Ok(1));
        assert!(vec.is_empty());

        vec.push(1);
        vec.push(2);
        assert_eq!(vec.min(), Some(&1));
        assert_eq!(vec.max(), Some(&2));
        assert!(vec.is_full());

        assert_eq!(vec.remove(1), Ok(2));
        assert_eq!(vec.remove(0), Ok(1));
        assert!(vec.is_empty());
        assert_eq!(vec.remove(0), Err(Error::OutOfBounds { index: 0, len: 0 }));
    }

    #[test]
    fn full_vector_rejects_and_never_reallocates() {
        let mut vec = FixedVector::with_capacity(8);
        for i in 0..8 {
            assert_eq!(vec.try_push(i), Ok(()));
        }
        assert_eq!(vec.try_push(8), Err(8));
        assert_eq!(vec.len(), 8);

        while vec.len() > 1 {
            vec.pop();
        }
        assert_eq!(vec.capacity(), 8);
        assert_eq!(vec.remove(0), Ok(0));
        assert_eq!(vec.capacity(), 8);
    }

    #[test]
    #[should_panic(expected = "vector is already at capacity")]
    fn push_onto_full_vector_panics() {
        let mut vec = FixedVector::with_capacity(1);
        vec.push('a');
        vec.push('b');
    }

    #[test]
    fn strings_min_max_and_removal() {
        let mut vec = FixedVector::with_capacity(3);
        vec.push("Hello");
        vec.push("World");
        vec.push("Hello World");

        assert_eq!(vec.min(), Some(&"Hello"));
        assert_eq!(vec.max(), Some(&"World"));
        assert_eq!(vec.remove(1), Ok("World"));
        assert_eq!(vec.remove_item(&"Hello"), Some("Hello"));
        assert_eq!(vec.as_slice(), &["Hello World"]);
    }

    #[test]
    fn interleaved_input_sorts() {
        const N: i32 = 10_000;
        let mut vec = FixedVector::with_capacity(N as usize);
        for i in 0..N / 2 {
            vec.push(i);
            vec.push(N - i - 1);
        }
        assert!(!vec.windows(2).all(|w| w[0] <= w[1]));

        vec.sort();
        assert!(vec.windows(2).all(|w| w[0] <= w[1]));
        assert!(vec.is_full());
    }

    #[test]
    fn converts_to_growable_vector() {
        let mut vec = FixedVector::with_capacity(2);
        vec.push(1);
        vec.push(2);

        let mut growable = Vector::from(vec);
        growable.push(3);
        assert_eq!(growable, [1, 2, 3]);
    }

    #[test]
    fn arena_allocation_happens_once() {
        let mut backing_region = [MaybeUninit::uninit(); 64];
        let arena = Arena::from_buffer(&mut backing_region[..]);

        let mut vec = FixedVector::<u8, _, _>::try_with_capacity_in(16, &arena).unwrap();
        let remaining = arena.remaining();
        for i in 0..16 {
            vec.push(i);
        }
        assert_eq!(vec.try_push(16), Err(16));
        for _ in 0..16 {
            vec.pop();
        }
        assert_eq!(arena.remaining(), remaining);
    }
}
