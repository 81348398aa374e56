//! In-place unstable sorting.
//!
//! The algorithm is a Hoare-partitioning quicksort with median-of-three pivot
//! selection. Instead of recursing, the larger half of every partition is
//! pushed onto a fixed-size stack and the loop continues with the smaller
//! half, so auxiliary space is bounded by `O(log n)` regardless of input.
//! Ranges of at most [`INSERTION_SORT_THRESHOLD`] elements are finished with
//! insertion sort.
//!
//! Elements are only ever moved by swapping, so a panicking comparator leaves
//! the slice as some permutation of its original content.

use core::cmp::Ordering;

use crate::cmp::Compare;

/// Ranges of at most this many elements are insertion sorted.
pub const INSERTION_SORT_THRESHOLD: usize = 27;

// Every pushed range is the larger half of its parent, and every range that
// is continued is at most half of its parent, so the stack never holds more
// than log2(usize::MAX) entries.
const STACK_DEPTH: usize = usize::BITS as usize;

/// Sorts `v` in non-decreasing order.
///
/// # Examples
/// ```
/// let mut v = [5, 4, 1, 3, 2];
/// growable::sort::sort(&mut v);
/// assert_eq!(v, [1, 2, 3, 4, 5]);
/// ```
#[inline]
pub fn sort<T: Ord>(v: &mut [T]) {
    sort_by(v, T::cmp)
}

/// Sorts `v` in non-decreasing order under `cmp`.
#[inline]
pub fn sort_with<T, C: Compare<T> + ?Sized>(v: &mut [T], cmp: &C) {
    sort_by(v, |a, b| cmp.compare(a, b))
}

/// Sorts `v` in non-decreasing order under the comparator function `compare`.
///
/// # Examples
/// ```
/// let mut words = ["pear", "fig", "banana"];
/// growable::sort::sort_by(&mut words, |a, b| a.len().cmp(&b.len()));
/// assert_eq!(words, ["fig", "pear", "banana"]);
/// ```
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut is_less = |a: &T, b: &T| compare(a, b) == Ordering::Less;

    let mut stack = [(0usize, 0usize); STACK_DEPTH];
    let mut top = 0;
    let (mut lo, mut hi) = (0, v.len());

    loop {
        if hi - lo <= INSERTION_SORT_THRESHOLD {
            insertion_sort(&mut v[lo..hi], &mut is_less);

            if top == 0 {
                break;
            }
            top -= 1;
            (lo, hi) = stack[top];
        } else {
            let mid = lo + partition(&mut v[lo..hi], &mut is_less);

            if mid - lo >= hi - (mid + 1) {
                stack[top] = (lo, mid);
                lo = mid + 1;
            } else {
                stack[top] = (mid + 1, hi);
                hi = mid;
            }
            top += 1;
        }
    }
}

fn insertion_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.len() < 2 {
        return;
    }

    // Bring the minimum to the front; it then stops every inner scan below
    // without a bounds check.
    for i in 1..v.len() {
        if is_less(&v[i], &v[0]) {
            v.swap(i, 0);
        }
    }

    for i in 2..v.len() {
        let mut j = i;
        while is_less(&v[j], &v[j - 1]) {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Orders the first, middle and last element of `v` and returns the index
/// of the middle one, which then holds the median of the three.
fn median_of_three<T, F>(v: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let (l, r) = (0, v.len() - 1);
    let m = r / 2;

    if is_less(&v[m], &v[l]) {
        if is_less(&v[r], &v[l]) {
            if is_less(&v[r], &v[m]) {
                // r < m < l
                v.swap(l, r);
            } else {
                // m <= r < l
                rotate(v, l, m, r);
            }
        } else {
            // m < l <= r
            v.swap(l, m);
        }
    } else if is_less(&v[r], &v[m]) {
        if is_less(&v[r], &v[l]) {
            // r < l <= m
            rotate(v, r, m, l);
        } else {
            // l <= r < m
            v.swap(m, r);
        }
    }

    m
}

/// Moves `v[b]` to `a`, `v[c]` to `b` and `v[a]` to `c`.
#[inline]
fn rotate<T>(v: &mut [T], a: usize, b: usize, c: usize) {
    v.swap(a, b);
    v.swap(b, c);
}

/// Partitions `v` (of length greater than 3) around a median-of-three pivot
/// and returns the pivot's final index. Everything before it is not greater
/// than the pivot, everything after it is not less.
fn partition<T, F>(v: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(v.len() > 3);

    let mid = median_of_three(v, is_less);
    let right = v.len() - 1;

    // The pivot sits at index 1 for the whole scan. v[0] <= pivot stops the
    // right cursor, v[right] >= pivot stops the left one.
    v.swap(mid, 1);
    let pivot = 1;
    let (mut l, mut r) = (1, right);

    loop {
        l += 1;
        while is_less(&v[l], &v[pivot]) {
            l += 1;
        }
        r -= 1;
        while is_less(&v[pivot], &v[r]) {
            r -= 1;
        }
        if l >= r {
            break;
        }
        v.swap(l, r);
    }

    v.swap(pivot, r);
    r
}
