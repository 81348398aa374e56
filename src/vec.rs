//! A contiguous growable array with a stored comparator.
//!
//! [`Vector`] has O(1) indexing and amortized O(1) push, and removal that
//! preserves order in O(n). Its capacity doubles whenever a push finds it
//! full, and halves whenever a removal leaves fewer than a quarter of the
//! slots in use, so that alternating pushes and pops at either boundary
//! never reallocate on every operation.
//!
//! The comparator given at construction (by default [`Natural`], i.e. [`Ord`])
//! drives [`min`](Vector::min), [`max`](Vector::max), [`sort`](Vector::sort)
//! and [`remove_item`](Vector::remove_item).

use core::fmt;
use core::iter::{FusedIterator, IntoIterator as IntoIter};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice::SliceIndex;

use crate::allocator::{Allocator, Global};
use crate::cmp::{Compare, Natural};
use crate::error::{Error, Result};
use crate::storage::RawBuf;

/// A contiguous growable array type.
///
/// Generic over the element type `T`, the comparator `C` and the allocator
/// `A`.
///
/// See the [module-level documentation](crate::vec) for more.
pub struct Vector<T, C = Natural, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    len: usize,
    cmp: C,
}

impl<T> Vector<T> {
    /// Constructs a new, empty vector without allocating.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty vector with room for `capacity` elements.
    ///
    /// # Panics
    /// Aborts on allocation failure like the standard collections.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_comparator_in(capacity, Natural, Global)
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Vector<T, C> {
    /// Constructs a new, empty vector ordered by `cmp`.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::with_comparator(4, |a: &i32, b: &i32| b.cmp(a));
    /// vec.push(1); vec.push(3); vec.push(2);
    /// vec.sort();
    /// assert_eq!(vec, &[3, 2, 1][..]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn with_comparator(capacity: usize, cmp: C) -> Self {
        Self::with_comparator_in(capacity, cmp, Global)
    }
}

impl<T, A: Allocator> Vector<T, Natural, A> {
    /// Constructs a new, empty vector allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::with_comparator_in(capacity, Natural, alloc)
    }

    /// Constructs a new, empty vector allocating out of `alloc`, returning
    /// an error instead of aborting if the initial allocation fails.
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Self::try_with_comparator_in(capacity, Natural, alloc)
    }
}

impl<T, C, A: Allocator> Vector<T, C, A> {
    /// Constructs a new, empty vector ordered by `cmp` and allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_comparator_in(capacity: usize, cmp: C, alloc: A) -> Self {
        match Self::try_with_comparator_in(capacity, cmp, alloc) {
            Ok(vec) => vec,
            Err(e) => e.abort(),
        }
    }

    /// Fallible version of [`with_comparator_in`](Vector::with_comparator_in).
    pub fn try_with_comparator_in(capacity: usize, cmp: C, alloc: A) -> Result<Self> {
        Ok(Vector {
            buf: RawBuf::try_with_capacity_in(capacity, alloc)?,
            len: 0,
            cmp,
        })
    }

    fn into_raw_parts(self) -> (RawBuf<T, A>, usize, C) {
        let this = core::mem::ManuallyDrop::new(self);
        unsafe {
            (
                ptr::read(&this.buf),
                this.len,
                ptr::read(&this.cmp),
            )
        }
    }

    /// Returns the number of elements the vector can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the vector, also referred to as its 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next push will reallocate.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.capacity()
    }

    /// Returns a reference to the comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns a reference to the allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { core::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { core::slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Splits the vector into its elements and its comparator, so both can
    /// be used at the same time.
    #[inline]
    pub(crate) fn split_mut(&mut self) -> (&mut [T], &C) {
        let slice = unsafe { core::slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) };
        (slice, &self.cmp)
    }

    /// Returns a reference to the element at the specified index, or [`None`]
    /// if the index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::new();
    /// vec.push(1); vec.push(2); vec.push(3);
    /// assert_eq!(vec.get(1), Some(&2));
    /// assert_eq!(vec.get(3), None);
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns a mutable reference to the element at the specified index, or
    /// [`None`] if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Replaces the element at `index` with `value`, returning the old element.
    ///
    /// # Examples
    /// ```
    /// use growable::{Error, Vector};
    /// let mut vec = Vector::new();
    /// vec.push('a'); vec.push('b');
    /// assert_eq!(vec.set(1, 'c'), Ok('b'));
    /// assert_eq!(vec.set(2, 'd'), Err(Error::OutOfBounds { index: 2, len: 2 }));
    /// assert_eq!(vec, &['a', 'c'][..]);
    /// ```
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let len = self.len;
        match self.get_mut(index) {
            Some(slot) => Ok(core::mem::replace(slot, value)),
            None => Err(Error::OutOfBounds { index, len }),
        }
    }

    /// Appends an element to the back of the vector, returning `Err(value)`
    /// if the allocator cannot provide room for it.
    pub fn try_push(&mut self, value: T) -> core::result::Result<(), T> {
        if self.is_full() && self.buf.try_grow().is_err() {
            return Err(value);
        }

        unsafe { self.buf.mut_ptr_at(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Appends an element to the back of the vector, doubling its capacity
    /// first if it is full.
    ///
    /// # Panics
    /// Aborts on allocation failure. See [`try_push`](Vector::try_push) for
    /// a checked version.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::with_capacity(2);
    /// vec.push(1); vec.push(2); vec.push(3);
    /// assert_eq!(vec.capacity(), 4);
    /// assert_eq!(vec, &[1, 2, 3][..]);
    /// ```
    #[track_caller]
    pub fn push(&mut self, value: T) {
        if self.is_full() {
            if let Err(e) = self.buf.try_grow() {
                e.abort();
            }
        }

        unsafe { self.buf.mut_ptr_at(self.len).write(value) };
        self.len += 1;
    }

    /// Removes the last element from the vector and returns it, or [`None`]
    /// if it is empty.
    ///
    /// Halves the capacity if fewer than a quarter of the slots stay in use.
    pub fn pop(&mut self) -> Option<T> {
        let value = self.pop_in_place()?;
        self.buf.shrink_if_sparse(self.len);
        Some(value)
    }

    /// Like [`pop`](Vector::pop), but never reallocates.
    pub(crate) fn pop_in_place(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        self.len -= 1;
        Some(unsafe { self.buf.ptr_at(self.len).read() })
    }

    /// Removes and returns the element at position `index`, shifting all
    /// elements after it to the left.
    ///
    /// Halves the capacity if fewer than a quarter of the slots stay in use.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::new();
    /// vec.push(1); vec.push(2); vec.push(3);
    /// assert_eq!(vec.remove(0), Ok(1));
    /// assert!(vec.remove(2).is_err());
    /// assert_eq!(vec, &[2, 3][..]);
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let value = self.remove_in_place(index)?;
        self.buf.shrink_if_sparse(self.len);
        Ok(value)
    }

    /// Like [`remove`](Vector::remove), but never reallocates.
    pub(crate) fn remove_in_place(&mut self, index: usize) -> Result<T> {
        let len = self.len;
        if index >= len {
            return Err(Error::OutOfBounds { index, len });
        }

        let value = unsafe {
            let p = self.buf.mut_ptr_at(index);
            let ret = ptr::read(p);
            ptr::copy(p.add(1), p, len - index - 1);
            ret
        };

        self.len = len - 1;
        Ok(value)
    }

    /// Shortens the vector, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater than the vector's current length, this has no
    /// effect. The capacity is left unchanged.
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len;
        if len >= old_len {
            return;
        }

        self.len = len;
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.mut_ptr_at(len),
                old_len - len,
            ));
        }
    }

    /// Clears the vector, dropping all values.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Calls `f` on every element in index order.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::new();
    /// vec.push(1); vec.push(2); vec.push(3);
    /// let mut total = 0;
    /// vec.for_each(|x| total += *x);
    /// assert_eq!(total, 6);
    /// ```
    pub fn for_each<F: FnMut(&T)>(&self, f: F) {
        self.as_slice().iter().for_each(f)
    }

    /// Calls `f` on a mutable reference to every element in index order.
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.as_mut_slice().iter_mut().for_each(f)
    }
}

impl<T, C: Compare<T>, A: Allocator> Vector<T, C, A> {
    /// Returns the smallest element under the comparator, or [`None`] if
    /// the vector is empty. Of several equal minima, the first is returned.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::new();
    /// vec.push(4); vec.push(-2); vec.push(9);
    /// assert_eq!(vec.min(), Some(&-2));
    /// assert_eq!(vec.max(), Some(&9));
    /// ```
    pub fn min(&self) -> Option<&T> {
        let mut iter = self.as_slice().iter();
        let first = iter.next()?;
        Some(iter.fold(first, |best, x| {
            if self.cmp.compare(best, x).is_gt() {
                x
            } else {
                best
            }
        }))
    }

    /// Returns the greatest element under the comparator, or [`None`] if
    /// the vector is empty. Of several equal maxima, the first is returned.
    pub fn max(&self) -> Option<&T> {
        let mut iter = self.as_slice().iter();
        let first = iter.next()?;
        Some(iter.fold(first, |best, x| {
            if self.cmp.compare(best, x).is_lt() {
                x
            } else {
                best
            }
        }))
    }

    /// Returns the index of the first element equal to `item` under the
    /// comparator.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.as_slice()
            .iter()
            .position(|x| self.cmp.compare(x, item).is_eq())
    }

    /// Returns `true` if an element equal to `item` under the comparator is present.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Removes and returns the first element equal to `item` under the
    /// comparator, or [`None`] if there is none.
    ///
    /// # Examples
    /// ```
    /// let mut vec = growable::Vector::new();
    /// vec.push(5); vec.push(6); vec.push(5);
    /// assert_eq!(vec.remove_item(&5), Some(5));
    /// assert_eq!(vec.remove_item(&7), None);
    /// assert_eq!(vec, &[6, 5][..]);
    /// ```
    pub fn remove_item(&mut self, item: &T) -> Option<T> {
        let index = self.position(item)?;
        self.remove(index).ok()
    }

    /// Sorts the vector in place under its comparator.
    ///
    /// This sort is unstable. See [`crate::sort`] for the algorithm.
    pub fn sort(&mut self) {
        let (slice, cmp) = self.split_mut();
        crate::sort::sort_with(slice, cmp);
    }
}

impl<T, C, A: Allocator> Drop for Vector<T, C, A> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.as_mut_ptr(), self.len));
        }
    }
}

impl<T, C, A: Allocator> Deref for Vector<T, C, A> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C, A: Allocator> DerefMut for Vector<T, C, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, C, A: Allocator, Idx: SliceIndex<[T]>> Index<Idx> for Vector<T, C, A> {
    type Output = Idx::Output;
    #[inline]
    fn index(&self, index: Idx) -> &Self::Output {
        self.as_slice().index(index)
    }
}

impl<T, C, A: Allocator, Idx: SliceIndex<[T]>> IndexMut<Idx> for Vector<T, C, A> {
    #[inline]
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        self.as_mut_slice().index_mut(index)
    }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for Vector<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T: Clone, C: Clone, A: Allocator + Clone> Clone for Vector<T, C, A> {
    fn clone(&self) -> Self {
        let mut result =
            Vector::with_comparator_in(self.capacity(), self.cmp.clone(), self.allocator().clone());
        for item in self.as_slice() {
            result.push(item.clone());
        }
        result
    }
}

impl<T, C, A: Allocator> Extend<T> for Vector<T, C, A> {
    fn extend<I: IntoIter<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, C: Default, A: Allocator + Default> core::iter::FromIterator<T> for Vector<T, C, A> {
    fn from_iter<I: IntoIter<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut result = Vector::with_comparator_in(iter.size_hint().0, C::default(), A::default());
        result.extend(iter);
        result
    }
}

impl<AT, BT, AC, BC, AA, BA> PartialEq<Vector<BT, BC, BA>> for Vector<AT, AC, AA>
where
    AT: PartialEq<BT>,
    AA: Allocator,
    BA: Allocator,
{
    #[inline]
    fn eq(&self, other: &Vector<BT, BC, BA>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, C, A: Allocator> PartialEq<&[U]> for Vector<T, C, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, C, A: Allocator, const N: usize> PartialEq<[U; N]> for Vector<T, C, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T: Eq, C, A: Allocator> Eq for Vector<T, C, A> {}

/// A consuming iterator over the elements of a [`Vector`].
///
/// This `struct` is created by the `into_iter` method on [`Vector`] (provided
/// by the [`IntoIterator`](core::iter::IntoIterator) trait).
pub struct IntoIterator<T, A: Allocator = Global> {
    start: usize,
    end: usize,
    buf: RawBuf<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIterator<T, A> {
    type Item = T;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.end - self.start;
        (size, Some(size))
    }

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }

        let ret = unsafe { self.buf.ptr_at(self.start).read() };
        self.start += 1;
        Some(ret)
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIterator<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }

        self.end -= 1;
        Some(unsafe { self.buf.ptr_at(self.end).read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIterator<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIterator<T, A> {}

impl<T, A: Allocator> Drop for IntoIterator<T, A> {
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

impl<T, C, A: Allocator> IntoIter for Vector<T, C, A> {
    type Item = T;
    type IntoIter = IntoIterator<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let (buf, len, _) = self.into_raw_parts();
        IntoIterator { start: 0, end: len, buf }
    }
}

impl<'a, T, C, A: Allocator> IntoIter for &'a Vector<T, C, A> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, C, A: Allocator> IntoIter for &'a mut Vector<T, C, A> {
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
    use core::cell::Cell;
    use core::mem::MaybeUninit;

    #[test]
    fn capacity_hysteresis() {
        let mut vec = Vector::with_capacity(16);
        for i in 0..16 {
            vec.push(i);
        }
        assert_eq!(vec.capacity(), 16);

        while vec.len() > 4 {
            vec.pop();
            assert_eq!(vec.capacity(), 16);
        }
        vec.pop();
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.capacity(), 8);

        // alternating at the growth boundary does not thrash
        let mut vec = Vector::with_capacity(8);
        vec.extend(0..8);
        vec.push(8);
        assert_eq!(vec.capacity(), 16);
        for _ in 0..10 {
            vec.pop();
            assert_eq!(vec.capacity(), 16);
            vec.push(8);
            assert_eq!(vec.capacity(), 16);
        }
    }

    #[test]
    fn remove_shifts_and_shrinks() {
        let mut vec = Vector::with_capacity(8);
        vec.extend(0..8);
        assert_eq!(vec.remove(3), Ok(3));
        assert_eq!(vec, [0, 1, 2, 4, 5, 6, 7]);

        while vec.len() > 1 {
            vec.remove(0).unwrap();
        }
        assert_eq!(vec, [7]);
        assert!(vec.capacity() < 8);
        assert_eq!(vec.remove(1), Err(Error::OutOfBounds { index: 1, len: 1 }));
    }

    #[test]
    fn comparator_drives_queries() {
        let mut vec = Vector::with_comparator(0, |a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
        vec.extend([(3, 'a'), (1, 'b'), (3, 'c'), (1, 'd')].iter().copied());

        assert_eq!(vec.min(), Some(&(1, 'b')));
        assert_eq!(vec.max(), Some(&(3, 'a')));
        assert_eq!(vec.remove_item(&(1, 'z')), Some((1, 'b')));
        assert_eq!(vec.len(), 3);

        vec.sort();
        assert_eq!(vec[0], (1, 'd'));
        assert!(vec.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn empty_queries() {
        let mut vec: Vector<i32> = Vector::new();
        assert_eq!(vec.min(), None);
        assert_eq!(vec.max(), None);
        assert_eq!(vec.pop(), None);
        assert_eq!(vec.remove_item(&1), None);
        vec.sort();
        assert!(vec.is_empty());
    }

    #[test]
    fn for_each_visits_in_order() {
        let mut vec = Vector::new();
        vec.extend(1..=4);
        vec.for_each_mut(|x| *x *= 10);

        let mut seen = alloc::vec::Vec::new();
        vec.for_each(|x| seen.push(*x));
        assert_eq!(seen, [10, 20, 30, 40]);
    }

    #[test]
    fn arena_backed_growth_reuses_tail() {
        // room for 64 u32s after any alignment padding, but never for 128
        let mut backing_region = [MaybeUninit::uninit(); 260];
        let arena = Arena::from_buffer(&mut backing_region[..]);

        let mut vec = Vector::with_capacity_in(1, &arena);
        for i in 0..32u32 {
            vec.push(i);
        }
        assert_eq!(vec.capacity(), 32);
        assert!(arena.remaining() >= 260 - 128 - 3);

        let mut over = 32u32;
        let result = loop {
            if let Err(v) = vec.try_push(over) {
                break v;
            }
            over += 1;
        };
        assert_eq!(result, 64);
        assert_eq!(vec.len(), 64);
    }

    #[test]
    fn drops_every_element_once() {
        #[derive(Clone)]
        struct Droppable<'a> {
            value: usize,
            counter: &'a Cell<usize>,
        }

        impl Drop for Droppable<'_> {
            fn drop(&mut self) {
                let count = self.counter.get();
                self.counter.set(count + 1);
            }
        }

        let drop_count = Cell::new(0usize);

        let mut vec = Vector::new();
        for i in 1..=8 {
            vec.push(Droppable {
                value: i,
                counter: &drop_count,
            });
        }

        let removed = vec.remove(1).unwrap();
        assert_eq!(removed.value, 2);
        drop(removed);
        assert_eq!(drop_count.get(), 1);

        vec.truncate(5);
        assert_eq!(drop_count.get(), 3);

        let old = vec.set(0, Droppable { value: 100, counter: &drop_count }).ok().unwrap();
        drop(old);
        assert_eq!(drop_count.get(), 4);

        let mut into_iter = vec.into_iter();
        assert_eq!(into_iter.next().unwrap().value, 100);
        assert_eq!(into_iter.next_back().unwrap().value, 6);
        assert_eq!(drop_count.get(), 6);

        drop(into_iter);
        assert_eq!(drop_count.get(), 9);
    }

    #[test]
    fn clones_are_independent() {
        let mut a = Vector::new();
        a.extend(0..5);
        let mut b = a.clone();
        b.push(5);
        assert_eq!(a.len(), 5);
        assert_eq!(b, [0, 1, 2, 3, 4, 5]);
        let c: Vector<i32> = (0..5).collect();
        assert_eq!(a, c);
    }
}
