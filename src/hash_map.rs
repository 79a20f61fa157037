use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Index;

use crate::error::TryReserveError;
use crate::hash::BuildHasherKeys;
use crate::hash::DefaultHashBuilder;
use crate::hash::EqKeys;
use crate::hash_table::Drain;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::hash_table::Iter;
use crate::hash_table::IterMut;
use crate::hash_table::Keys;
use crate::hash_table::Values;

/// A hash map for `Hash + Eq` keys, backed by a linear-probing
/// [`HashTable`].
///
/// `HashMap<K, V, S>` hashes keys with a configurable hasher builder `S` and
/// compares them with [`Eq`]. Unlike the table's `put`, the map's insertion
/// methods are infallible by default: a capacity overflow panics and an
/// allocation failure aborts through
/// [`handle_alloc_error`](alloc::alloc::handle_alloc_error). The `try_`
/// variants report both instead.
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<K, V, BuildHasherKeys<S>, EqKeys>,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots of the underlying table.
    ///
    /// The map holds fewer than `capacity() * 3 / 4` elements before it
    /// grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the map's hasher builder.
    pub fn hasher(&self) -> &S {
        self.table.hasher().hasher()
    }

    /// Removes all elements from the map, keeping its capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Returns an iterator over the key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    /// Returns an iterator over the keys, in arbitrary order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.table.keys()
    }

    /// Returns an iterator over the values, in arbitrary order.
    pub fn values(&self) -> Values<'_, K, V> {
        self.table.values()
    }

    /// Removes and yields all key-value pairs, keeping the capacity.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.table.drain()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chest::HashMap;
    /// use chest::hash::FnvBuildHasher;
    ///
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(FnvBuildHasher::default());
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty map able to hold `capacity` elements without growing.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity, BuildHasherKeys(hash_builder), EqKeys),
        }
    }

    /// Fallible version of
    /// [`with_capacity_and_hasher`](Self::with_capacity_and_hasher).
    pub fn try_with_capacity_and_hasher(
        capacity: usize,
        hash_builder: S,
    ) -> Result<Self, TryReserveError> {
        Ok(Self {
            table: HashTable::try_with_capacity(capacity, BuildHasherKeys(hash_builder), EqKeys)?,
        })
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.table.reserve(additional) {
            err.handle();
        }
    }

    /// Reserves room for at least `additional` more elements, reporting
    /// failure instead of panicking. The map is unchanged on error.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table.reserve(additional)
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chest::HashMap;
    /// use chest::hash::ScalarBuildHasher;
    ///
    /// let mut map = HashMap::with_hasher(ScalarBuildHasher::default());
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.try_insert(key, value).unwrap_or_else(|err| err.handle())
    }

    /// Inserts a key-value pair, reporting a failed growth instead of
    /// aborting. On error the map is unchanged and the pair is dropped.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, TryReserveError> {
        self.table.put(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.table.get_key_value(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key)
    }

    /// Removes a key, returning the stored key and value if present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.table.remove_entry(key)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chest::HashMap;
    /// use chest::hash::FnvBuildHasher;
    ///
    /// let mut letters = HashMap::with_hasher(FnvBuildHasher::default());
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    /// assert_eq!(letters[&'s'], 2);
    /// assert_eq!(letters[&'t'], 3);
    /// assert_eq!(letters.get(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        self.try_entry(key).unwrap_or_else(|err| err.handle())
    }

    /// Gets the entry for `key`, reporting a failed growth instead of
    /// aborting.
    pub fn try_entry(&mut self, key: K) -> Result<Entry<'_, K, V>, TryReserveError> {
        self.table.entry(key)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map using the default hasher builder.
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chest::HashMap;
    ///
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// map.insert("one", 1);
    /// assert_eq!(map.get(&"one"), Some(&1));
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map able to hold `capacity` elements without
    /// growing, using the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Index<&K> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found in HashMap")
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 8);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
    }

    #[test]
    fn test_with_capacity() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::with_capacity(100);
        assert!(map.capacity() * 3 > 100 * 4);
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        assert_eq!(map.insert(1, "hello".to_string()), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert_eq!(
            map.insert(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_get_mut_and_contains() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_remove() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert_eq!(map.remove_entry(&2), Some((2, "world".to_string())));
        assert!(map.is_empty());
        assert_eq!(map.remove(&2), None);
    }

    #[test]
    fn test_entry() {
        let mut map: HashMap<&str, Vec<u32>, SipHashBuilder> = HashMap::new();
        map.entry("a").or_default().push(1);
        map.entry("a").or_default().push(2);
        map.entry("b").and_modify(|v| v.push(7)).or_insert_with(Vec::new);

        assert_eq!(map[&"a"], [1, 2]);
        assert!(map[&"b"].is_empty());

        match map.entry("a") {
            Entry::Occupied(entry) => assert_eq!(entry.remove(), [1, 2]),
            Entry::Vacant(_) => panic!("expected occupied entry"),
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iterators() {
        let mut map: HashMap<u32, u32, SipHashBuilder> = (0..50).map(|i| (i, i * i)).collect();
        assert_eq!(map.len(), 50);

        let mut keys: Vec<u32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());
        assert_eq!(map.values().map(|v| *v as u64).sum::<u64>(), 40425);

        for (_, v) in &mut map {
            *v += 1;
        }
        assert_eq!(map[&7], 50);

        let drained: Vec<(u32, u32)> = map.drain().collect();
        assert_eq!(drained.len(), 50);
        assert!(map.is_empty());
    }

    #[test]
    fn test_eq_and_debug() {
        let a: HashMap<u8, char, SipHashBuilder> = [(1, 'a'), (2, 'b')].into_iter().collect();
        let mut b: HashMap<u8, char, SipHashBuilder> = [(2, 'b')].into_iter().collect();
        assert_ne!(a, b);
        b.insert(1, 'a');
        assert_eq!(a, b);

        let single: HashMap<u8, char, SipHashBuilder> = [(9, 'z')].into_iter().collect();
        assert_eq!(alloc::format!("{single:?}"), "{9: 'z'}");
    }

    #[test]
    fn test_try_reserve_overflow() {
        let mut map: HashMap<u64, u64, SipHashBuilder> = HashMap::new();
        map.insert(1, 1);
        assert_eq!(
            map.try_reserve(usize::MAX),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.try_insert(2, 2), Ok(None));
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_key_panics() {
        let map: HashMap<u64, u64, SipHashBuilder> = HashMap::new();
        let _ = map[&3];
    }

    #[cfg(feature = "foldhash")]
    #[test]
    fn test_default_hasher() {
        let mut map: HashMap<String, usize> = HashMap::default();
        for word in ["chest", "slot", "probe", "chest"] {
            *map.entry(word.to_string()).or_insert(0) += 1;
        }
        assert_eq!(map.get(&"chest".to_string()), Some(&2));
        assert_eq!(map.len(), 3);
    }
}
