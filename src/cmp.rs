//! Three-way comparators used by the sorting and ordering containers.
//!
//! Any `Fn(&T, &T) -> Ordering` closure is a comparator. [`Natural`] defers to
//! [`Ord`], and [`Reverse`] flips another comparator, turning e.g. a min-heap
//! into a max-heap.

use core::cmp::Ordering;

/// A total order over `T`.
pub trait Compare<T: ?Sized> {
    /// Compares `a` with `b`; [`Ordering::Less`] means `a` sorts first.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Reverses the order of the wrapped comparator.
///
/// # Examples
/// ```
/// use growable::cmp::{Natural, Reverse};
/// use growable::BinaryHeap;
///
/// let mut heap = BinaryHeap::with_comparator(4, Reverse(Natural));
/// heap.push(1); heap.push(7); heap.push(3);
/// assert_eq!(heap.pop(), Some(7));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
