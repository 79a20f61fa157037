//! Hashing and equality policies for [`HashTable`](crate::HashTable).
//!
//! The table never looks inside a key. It asks a [`KeyHasher`] for a 64-bit
//! hash and a [`KeyEq`] whether two keys are the same. Plain closures
//! implement both traits, so a table can be driven by ad-hoc functions:
//!
//! ```rust
//! use chest::HashTable;
//! use chest::hash::fmix64;
//!
//! let mut table = HashTable::new(|k: &u32| fmix64(*k as u64), |a: &u32, b: &u32| a == b);
//! table.put(7, "seven").unwrap();
//! assert_eq!(table.get(&7), Some(&"seven"));
//! ```
//!
//! The policy types in this module cover the common cases: [`BuildHasherKeys`]
//! adapts any [`BuildHasher`] for `K: Hash`, and [`EqKeys`] compares with
//! [`Eq`].

use core::hash::BuildHasher;
use core::hash::BuildHasherDefault;
use core::hash::Hash;
use core::hash::Hasher;

/// Computes the 64-bit hash of a key.
///
/// Implementations must be deterministic and consistent with the [`KeyEq`]
/// used alongside them: keys that compare equal must hash equally.
pub trait KeyHasher<K: ?Sized> {
    /// Hashes `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Decides whether two keys are the same key.
///
/// Must be reflexive, symmetric and total.
pub trait KeyEq<K: ?Sized> {
    /// Returns `true` if `a` and `b` denote the same key.
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// A [`KeyHasher`] for any `K: Hash`, backed by a [`BuildHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildHasherKeys<S>(pub S);

impl<S> BuildHasherKeys<S> {
    /// Returns the wrapped hasher builder.
    pub fn hasher(&self) -> &S {
        &self.0
    }
}

impl<K, S> KeyHasher<K> for BuildHasherKeys<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

/// A [`KeyEq`] for any `K: Eq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqKeys;

impl<K> KeyEq<K> for EqKeys
where
    K: Eq + ?Sized,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashMap`](crate::HashMap) when none is
        /// given.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashMap`](crate::HashMap) when none is
        /// given.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder used by [`HashMap`](crate::HashMap) when none is
        /// given.
        ///
        /// Without `foldhash` or `std` there is no source of per-process
        /// randomness, so this falls back to the fixed FNV-1a hasher.
        pub type DefaultHashBuilder = FnvBuildHasher;
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// The 64-bit finalizer of MurmurHash3.
///
/// Cheap and well distributed for integer keys, which otherwise tend to cluster
/// when masked down to a power-of-two slot count.
#[inline]
pub const fn fmix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51afd7ed558ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ceb9fe1a85ec53);
    x ^= x >> 33;
    x
}

/// FNV-1a over a byte string.
#[inline]
pub const fn fnv1a(bytes: &[u8]) -> u64 {
    fnv1a_continue(FNV_OFFSET_BASIS, bytes)
}

#[inline]
const fn fnv1a_continue(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash = (hash ^ bytes[i] as u64).wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Streaming FNV-1a [`Hasher`].
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher {
    hash: u64,
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.hash = fnv1a_continue(self.hash, bytes);
    }
}

/// Builds [`FnvHasher`]s.
pub type FnvBuildHasher = BuildHasherDefault<FnvHasher>;

/// A [`Hasher`] tuned for scalar keys.
///
/// Integer writes are folded into the state and the result is finished with
/// [`fmix64`], so hashing a single `u64` costs one finalizer round. Byte
/// writes (strings, slices) fall back to FNV-1a.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarHasher {
    state: u64,
    written: bool,
}

impl ScalarHasher {
    #[inline]
    fn fold(&mut self, value: u64) {
        self.state = if self.written {
            fmix64(self.state ^ value)
        } else {
            value
        };
        self.written = true;
    }
}

impl Hasher for ScalarHasher {
    #[inline]
    fn finish(&self) -> u64 {
        fmix64(self.state)
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.fold(fnv1a(bytes));
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.fold(i as u64);
        self.fold((i >> 64) as u64);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }
}

/// Builds [`ScalarHasher`]s.
pub type ScalarBuildHasher = BuildHasherDefault<ScalarHasher>;

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::*;

    #[test]
    fn fmix64_matches_reference_values() {
        assert_eq!(fmix64(0), 0);
        assert_eq!(fmix64(1), 0xb456bcfc34c2cb2c);
        assert_eq!(fmix64(2), 0x3abf2a20650683e7);
        assert_eq!(fmix64(0xdeadbeef), 0xd24bd59f862a1dac);
    }

    #[test]
    fn fnv1a_matches_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn streaming_fnv_matches_one_shot() {
        let mut h = FnvHasher::default();
        h.write(b"foo");
        h.write(b"bar");
        assert_eq!(h.finish(), fnv1a(b"foobar"));
    }

    #[test]
    fn scalar_hasher_single_u64_is_fmix() {
        let builder = ScalarBuildHasher::default();
        let mut h = builder.build_hasher();
        h.write_u64(42);
        assert_eq!(h.finish(), fmix64(42));
        assert_eq!(builder.hash_one(42u64), fmix64(42));
    }

    #[test]
    fn closures_are_policies() {
        let hash = |k: &u64| fmix64(*k);
        let eq = |a: &u64, b: &u64| a == b;
        assert_eq!(hash.hash_key(&9u64), fmix64(9));
        assert!(eq.key_eq(&3u64, &3u64));
        assert!(!eq.key_eq(&3u64, &4u64));
    }

    #[test]
    fn build_hasher_keys_is_consistent_with_eq() {
        let keys = BuildHasherKeys(FnvBuildHasher::default());
        let a = alloc::string::String::from("chest");
        let b = alloc::string::String::from("chest");
        assert!(EqKeys.key_eq(&a, &b));
        assert_eq!(keys.hash_key(&a), keys.hash_key(&b));
    }
}
