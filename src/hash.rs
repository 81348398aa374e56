//! Key hashing for [`FixedHashSet`](crate::FixedHashSet).
//!
//! The set does not go through [`core::hash::Hash`] by default. Instead, a
//! [`KeyHasher`] maps a key straight to a `u64`: [`DefaultKeyHasher`] uses
//! the cheap [`KeyHash`] functions below (identity for integers, raw bits for
//! floats, a multiplicative rolling hash for strings), any `Fn(&T) -> u64`
//! closure can stand in for a custom one, and [`BuildHasherKeys`] adapts an
//! ordinary [`BuildHasher`] for keys that only implement `Hash`.
//!
//! Probing decides whether two keys are the same with a separate [`KeyEq`]
//! predicate. [`DefaultKeyEq`] defers to [`PartialEq`]; a custom hasher that
//! folds distinct values together (say, case-insensitive strings) should be
//! paired with an `Fn(&T, &T) -> bool` predicate that agrees with it.

use core::hash::{BuildHasher, Hash};

use alloc::string::String;

/// Multiplier applied to the rolling string hash to spread its bits.
const STR_HASH_MULTIPLIER: u64 = 1_327_217_885;

/// A type with a built-in hash function.
pub trait KeyHash {
    /// Returns the hash of `self`.
    fn key_hash(&self) -> u64;
}

macro_rules! impl_key_hash_by_cast {
    ($($t:ty),*) => {
        $(
            impl KeyHash for $t {
                #[inline]
                fn key_hash(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_key_hash_by_cast!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, char, bool);

impl KeyHash for f32 {
    #[inline]
    fn key_hash(&self) -> u64 {
        self.to_bits() as u64
    }
}

impl KeyHash for f64 {
    #[inline]
    fn key_hash(&self) -> u64 {
        self.to_bits()
    }
}

/// Hashes a byte string by computing `k = 33 * k + byte` over all bytes,
/// then multiplying the result by a large odd constant. All arithmetic wraps.
///
/// # Examples
/// ```
/// use growable::hash::{hash_bytes, KeyHash};
/// assert_eq!(hash_bytes(b""), 0);
/// assert_eq!(hash_bytes(b"a"), 97 * 1_327_217_885);
/// assert_eq!("a".key_hash(), hash_bytes(b"a"));
/// ```
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let k = bytes
        .iter()
        .fold(0u64, |k, &b| k.wrapping_add((k << 5).wrapping_add(b as u64)));
    k.wrapping_mul(STR_HASH_MULTIPLIER)
}

impl KeyHash for str {
    #[inline]
    fn key_hash(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }
}

impl KeyHash for String {
    #[inline]
    fn key_hash(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    #[inline]
    fn key_hash(&self) -> u64 {
        (**self).key_hash()
    }
}

/// A hashing strategy for keys of type `T`.
pub trait KeyHasher<T: ?Sized> {
    /// Returns the hash of `key`.
    fn hash_key(&self, key: &T) -> u64;
}

/// Hashes keys with their [`KeyHash`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultKeyHasher;

impl<T: KeyHash + ?Sized> KeyHasher<T> for DefaultKeyHasher {
    #[inline]
    fn hash_key(&self, key: &T) -> u64 {
        key.key_hash()
    }
}

impl<T: ?Sized, F> KeyHasher<T> for F
where
    F: Fn(&T) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &T) -> u64 {
        self(key)
    }
}

/// Hashes keys through a [`BuildHasher`], for key types that implement
/// [`Hash`] rather than [`KeyHash`].
///
/// # Examples
/// ```
/// use core::hash::BuildHasherDefault;
/// use growable::hash::{BuildHasherKeys, KeyHasher};
/// use rustc_hash::FxHasher;
///
/// let hasher = BuildHasherKeys(BuildHasherDefault::<FxHasher>::default());
/// assert_eq!(hasher.hash_key(&(1, 'x')), hasher.hash_key(&(1, 'x')));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildHasherKeys<S>(pub S);

impl<T: Hash + ?Sized, S: BuildHasher> KeyHasher<T> for BuildHasherKeys<S> {
    #[inline]
    fn hash_key(&self, key: &T) -> u64 {
        self.0.hash_one(key)
    }
}

/// An equivalence relation over keys of type `T`, used by the hash set to
/// recognize a key while probing.
///
/// Keys that are equal under this relation must hash alike.
pub trait KeyEq<T: ?Sized> {
    /// Returns `true` if `a` and `b` denote the same key.
    fn eq_key(&self, a: &T, b: &T) -> bool;
}

/// Compares keys with their [`PartialEq`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultKeyEq;

impl<T: PartialEq + ?Sized> KeyEq<T> for DefaultKeyEq {
    #[inline]
    fn eq_key(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

impl<T: ?Sized, F> KeyEq<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn eq_key(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
