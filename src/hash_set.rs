//! A fixed-capacity hash set using open addressing with linear probing.
//!
//! The table size is chosen once, at construction, and is always prime. The
//! set never grows: inserting into a table with no free slot left fails and
//! hands the item back.
//!
//! Removed entries leave a tombstone behind, so that a key which was placed
//! further along the same probe chain stays reachable. Insertion reuses the
//! first tombstone it passes once the key is known to be absent.

use core::fmt;
use core::iter::FusedIterator;
use core::ptr;

use crate::allocator::{Allocator, Global};
use crate::error::{Error, Result};
use crate::hash::{DefaultKeyEq, DefaultKeyHasher, KeyEq, KeyHasher};
use crate::storage::RawBuf;

enum Slot<T> {
    Empty,
    Deleted,
    Occupied(T),
}

impl<T> Slot<T> {
    #[inline]
    fn as_occupied(&self) -> Option<&T> {
        match self {
            Slot::Occupied(item) => Some(item),
            _ => None,
        }
    }
}

fn is_prime(n: usize) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Returns the smallest prime not less than `n`.
fn next_prime(n: usize) -> Result<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1).ok_or(Error::CapacityOverflow)?;
    }
    Ok(candidate)
}

/// A set with a fixed number of slots, backed by an open-addressing hash
/// table with linear probing.
///
/// Keys are hashed by `H` and told apart by `E`; the two must agree, in that
/// keys `E` considers equal have to hash alike.
///
/// # Examples
/// ```
/// let mut set = growable::FixedHashSet::with_capacity(4);
/// assert_eq!(set.capacity(), 5);
///
/// assert_eq!(set.insert(17u32), Ok(true));
/// assert_eq!(set.insert(17), Ok(false));
/// assert!(set.contains(&17));
/// assert!(set.remove(&17));
/// assert!(!set.contains(&17));
/// ```
pub struct FixedHashSet<T, H = DefaultKeyHasher, E = DefaultKeyEq, A: Allocator = Global> {
    slots: RawBuf<Slot<T>, A>,
    len: usize,
    hasher: H,
    eq: E,
}

impl<T> FixedHashSet<T> {
    /// Constructs a new, empty set with room for at least `capacity`
    /// elements, using the [`DefaultKeyHasher`].
    ///
    /// The capacity is rounded up to the next prime; it is never less than 2.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_hasher_in(capacity, DefaultKeyHasher, Global)
    }
}

impl<T, H> FixedHashSet<T, H> {
    /// Constructs a new, empty set with room for at least `capacity`
    /// elements, hashing keys with `hasher`.
    ///
    /// # Examples
    /// ```
    /// let mut set = growable::FixedHashSet::with_hasher(3, |s: &&str| s.len() as u64);
    /// assert_eq!(set.insert("ab"), Ok(true));
    /// assert_eq!(set.insert("cd"), Ok(true));
    /// assert!(set.contains(&"cd"));
    /// ```
    #[inline]
    #[track_caller]
    pub fn with_hasher(capacity: usize, hasher: H) -> Self {
        Self::with_hasher_in(capacity, hasher, Global)
    }
}

impl<T, H, E> FixedHashSet<T, H, E> {
    /// Constructs a new, empty set with room for at least `capacity`
    /// elements, hashing keys with `hasher` and comparing them with `eq`.
    ///
    /// # Examples
    /// ```
    /// let mut set = growable::FixedHashSet::with_hasher_and_eq(
    ///     7,
    ///     |s: &&str| s.len() as u64,
    ///     |a: &&str, b: &&str| a.eq_ignore_ascii_case(b),
    /// );
    /// assert_eq!(set.insert("Hello"), Ok(true));
    /// assert_eq!(set.insert("HELLO"), Ok(false));
    /// assert!(set.contains(&"hello"));
    /// ```
    #[inline]
    #[track_caller]
    pub fn with_hasher_and_eq(capacity: usize, hasher: H, eq: E) -> Self {
        Self::with_hasher_and_eq_in(capacity, hasher, eq, Global)
    }
}

impl<T, A: Allocator> FixedHashSet<T, DefaultKeyHasher, DefaultKeyEq, A> {
    /// Constructs a new, empty set allocating out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::with_hasher_in(capacity, DefaultKeyHasher, alloc)
    }
}

impl<T, H, A: Allocator> FixedHashSet<T, H, DefaultKeyEq, A> {
    /// Constructs a new, empty set hashing keys with `hasher` and allocating
    /// out of `alloc`.
    #[inline]
    #[track_caller]
    pub fn with_hasher_in(capacity: usize, hasher: H, alloc: A) -> Self {
        Self::with_hasher_and_eq_in(capacity, hasher, DefaultKeyEq, alloc)
    }

    /// Fallible version of [`with_hasher_in`](FixedHashSet::with_hasher_in).
    #[inline]
    pub fn try_with_hasher_in(capacity: usize, hasher: H, alloc: A) -> Result<Self> {
        Self::try_with_hasher_and_eq_in(capacity, hasher, DefaultKeyEq, alloc)
    }
}

impl<T, H, E, A: Allocator> FixedHashSet<T, H, E, A> {
    /// Constructs a new, empty set hashing keys with `hasher`, comparing them
    /// with `eq` and allocating out of `alloc`.
    #[track_caller]
    pub fn with_hasher_and_eq_in(capacity: usize, hasher: H, eq: E, alloc: A) -> Self {
        match Self::try_with_hasher_and_eq_in(capacity, hasher, eq, alloc) {
            Ok(set) => set,
            Err(e) => e.abort(),
        }
    }

    /// Fallible version of
    /// [`with_hasher_and_eq_in`](FixedHashSet::with_hasher_and_eq_in).
    pub fn try_with_hasher_and_eq_in(capacity: usize, hasher: H, eq: E, alloc: A) -> Result<Self> {
        let cap = next_prime(capacity)?;
        let mut slots: RawBuf<Slot<T>, A> = RawBuf::try_with_capacity_in(cap, alloc)?;
        for i in 0..cap {
            unsafe { slots.mut_ptr_at(i).write(Slot::Empty) };
        }

        Ok(FixedHashSet {
            slots,
            len: 0,
            hasher,
            eq,
        })
    }

    #[inline]
    fn slots(&self) -> &[Slot<T>] {
        unsafe { core::slice::from_raw_parts(self.slots.as_ptr(), self.slots.capacity()) }
    }

    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot<T>] {
        let cap = self.slots.capacity();
        unsafe { core::slice::from_raw_parts_mut(self.slots.as_mut_ptr(), cap) }
    }

    /// Returns the number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot holds an element.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns the fraction of slots holding an element.
    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.capacity() as f32
    }

    /// Returns a reference to the hasher.
    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns a reference to the key equality predicate.
    #[inline]
    pub fn key_eq(&self) -> &E {
        &self.eq
    }

    /// Returns an iterator over the elements in table order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots().iter(),
            remaining: self.len,
        }
    }

    /// Removes every element, dropping them and clearing all tombstones.
    pub fn clear(&mut self) {
        self.slots_mut().iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.len = 0;
    }
}

impl<T, H: KeyHasher<T>, E: KeyEq<T>, A: Allocator> FixedHashSet<T, H, E, A> {
    #[inline]
    fn home_slot(&self, item: &T) -> usize {
        (self.hasher.hash_key(item) % self.capacity() as u64) as usize
    }

    /// Walks the probe chain of `item` and returns the index of its slot.
    fn find(&self, item: &T) -> Option<usize> {
        let slots = self.slots();
        let cap = slots.len();
        let mut i = self.home_slot(item);

        for _ in 0..cap {
            match &slots[i] {
                Slot::Empty => return None,
                Slot::Occupied(x) if self.eq.eq_key(x, item) => return Some(i),
                _ => {}
            }
            i += 1;
            if i == cap {
                i = 0;
            }
        }

        None
    }

    /// Adds `item` to the set.
    ///
    /// Returns `Ok(true)` if it was newly inserted, `Ok(false)` if an equal
    /// element was already present (the set is left unchanged), and
    /// `Err(item)` if the table has no free slot left.
    ///
    /// # Examples
    /// ```
    /// let mut set = growable::FixedHashSet::with_capacity(2);
    /// assert_eq!(set.insert('a'), Ok(true));
    /// assert_eq!(set.insert('b'), Ok(true));
    /// assert_eq!(set.insert('a'), Ok(false));
    /// assert_eq!(set.insert('c'), Err('c'));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn insert(&mut self, item: T) -> core::result::Result<bool, T> {
        let cap = self.capacity();
        let mut i = self.home_slot(&item);
        let mut free = None;

        let slots = self.slots();
        for _ in 0..cap {
            match &slots[i] {
                Slot::Empty => {
                    free.get_or_insert(i);
                    break;
                }
                Slot::Deleted => {
                    free.get_or_insert(i);
                }
                Slot::Occupied(x) if self.eq.eq_key(x, &item) => return Ok(false),
                Slot::Occupied(_) => {}
            }
            i += 1;
            if i == cap {
                i = 0;
            }
        }

        match free {
            Some(i) => {
                self.slots_mut()[i] = Slot::Occupied(item);
                self.len += 1;
                Ok(true)
            }
            None => Err(item),
        }
    }

    /// Returns `true` if the set contains an element equal to `item`.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.find(item).is_some()
    }

    /// Removes the element equal to `item` and returns it, or [`None`] if
    /// there is none.
    pub fn take(&mut self, item: &T) -> Option<T> {
        let i = self.find(item)?;
        let slot = core::mem::replace(&mut self.slots_mut()[i], Slot::Deleted);
        self.len -= 1;
        match slot {
            Slot::Occupied(x) => Some(x),
            _ => None,
        }
    }

    /// Removes the element equal to `item`, returning whether it was present.
    #[inline]
    pub fn remove(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }
}

impl<T, H, E, A: Allocator> Drop for FixedHashSet<T, H, E, A> {
    fn drop(&mut self) {
        unsafe { ptr::drop_in_place(self.slots_mut() as *mut [Slot<T>]) };
    }
}

impl<T: fmt::Debug, H, E, A: Allocator> fmt::Debug for FixedHashSet<T, H, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, H, E, A: Allocator> IntoIterator for &'a FixedHashSet<T, H, E, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of a [`FixedHashSet`].
///
/// This `struct` is created by the [`iter`](FixedHashSet::iter) method.
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.slots.by_ref().find_map(Slot::as_occupied)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::BuildHasherKeys;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::hash::BuildHasherDefault;
    use rustc_hash::FxHasher;

    #[test]
    fn capacity_is_rounded_up_to_a_prime() {
        let caps: Vec<_> = [0, 1, 2, 3, 4, 8, 13, 24, 100]
            .iter()
            .map(|&c| FixedHashSet::<u32>::with_capacity(c).capacity())
            .collect();
        assert_eq!(caps, [2, 2, 2, 3, 5, 11, 13, 29, 101]);

        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(is_prime(7919));
        assert!(!is_prime(7917));
    }

    #[test]
    fn round_trip_and_duplicates() {
        let mut set = FixedHashSet::with_capacity(64);
        for i in 0..50i64 {
            assert_eq!(set.insert(i * 7 - 100), Ok(true));
        }
        assert_eq!(set.len(), 50);
        assert_eq!(set.insert(-100), Ok(false));
        assert_eq!(set.len(), 50);

        for i in 0..50i64 {
            assert!(set.contains(&(i * 7 - 100)));
            assert!(!set.contains(&(i * 7 - 99)));
        }
        assert!((set.load_factor() - 50.0 / 67.0).abs() < 1e-6);
    }

    #[test]
    fn deletion_keeps_later_chain_members_reachable() {
        // everything lands on the same home slot
        let mut set = FixedHashSet::with_hasher(7, |_: &u32| 3);
        for i in 1..=4 {
            assert_eq!(set.insert(i), Ok(true));
        }

        assert!(set.remove(&2));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));
        assert!(set.contains(&4));

        // reinsertion fills the tombstone, not the next empty slot
        assert_eq!(set.insert(5), Ok(true));
        assert!(matches!(set.slots()[4], Slot::Occupied(5)));
        assert_eq!(set.insert(4), Ok(false));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn full_table_rejects_new_items() {
        let mut set = FixedHashSet::with_hasher(3, |x: &u8| *x as u64);
        assert_eq!(set.capacity(), 3);
        for i in 0..3 {
            assert_eq!(set.insert(i), Ok(true));
        }
        assert!(set.is_full());
        assert_eq!(set.insert(9), Err(9));
        assert_eq!(set.insert(1), Ok(false));
        assert!(!set.contains(&9));

        // tombstones everywhere: lookups still terminate
        for i in 0..3 {
            assert!(set.remove(&i));
        }
        assert!(!set.contains(&0));
        assert_eq!(set.insert(9), Ok(true));
    }

    #[test]
    fn build_hasher_adapter() {
        let hasher = BuildHasherKeys(BuildHasherDefault::<FxHasher>::default());
        let mut set = FixedHashSet::with_hasher(16, hasher);
        for word in ["apple", "pear", "fig", "plum"].iter() {
            assert_eq!(set.insert(String::from(*word)), Ok(true));
        }
        assert!(set.contains(&String::from("fig")));
        assert_eq!(set.take(&String::from("pear")).as_deref(), Some("pear"));
        assert_eq!(set.iter().len(), 3);
    }

    #[test]
    fn caller_supplied_equality_drives_probing() {
        use crate::hash::hash_bytes;

        let fold_case = |s: &String| hash_bytes(s.to_ascii_lowercase().as_bytes());
        let same_ignoring_case = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        let mut set = FixedHashSet::with_hasher_and_eq(7, fold_case, same_ignoring_case);

        assert_eq!(set.insert(String::from("Hello")), Ok(true));
        assert_eq!(set.insert(String::from("HELLO")), Ok(false));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&String::from("hello")));
        assert!(!set.contains(&String::from("help")));

        // the stored spelling is the first one inserted
        assert_eq!(set.take(&String::from("hElLo")).as_deref(), Some("Hello"));
        assert!(set.is_empty());
    }

    #[test]
    fn strings_with_default_hasher() {
        let mut set = FixedHashSet::with_capacity(8);
        assert_eq!(set.insert(String::from("Hello")), Ok(true));
        assert_eq!(set.insert(String::from("World")), Ok(true));
        assert_eq!(set.insert(String::from("Hello")), Ok(false));
        let mut seen: Vec<_> = set.iter().cloned().collect();
        seen.sort();
        assert_eq!(seen, ["Hello", "World"]);
    }

    #[test]
    fn drops_occupied_slots() {
        #[derive(PartialEq, Eq)]
        struct Droppable<'a>(u32, &'a Cell<usize>);
        impl Drop for Droppable<'_> {
            fn drop(&mut self) {
                self.1.set(self.1.get() + 1);
            }
        }

        let drop_count = Cell::new(0);
        let mut set = FixedHashSet::with_hasher(5, |d: &Droppable<'_>| d.0 as u64);
        for i in 0..4 {
            assert!(set.insert(Droppable(i, &drop_count)).is_ok());
        }

        let key = Droppable(1, &drop_count);
        assert!(set.remove(&key));
        drop(key);
        assert_eq!(drop_count.get(), 2);

        set.clear();
        assert_eq!(drop_count.get(), 5);
        assert!(set.insert(Droppable(9, &drop_count)).is_ok());
        drop(set);
        assert_eq!(drop_count.get(), 6);
    }
}
