//! Open-addressing hash table with linear probing and tombstone deletion.
//!
//! [`HashTable`] stores `(K, V)` pairs in a single power-of-two array of
//! slots. Keys are located by walking forward from `hash & (capacity - 1)`;
//! removal leaves a tombstone behind so that other probe sequences stay
//! intact, and tombstones are reused by later insertions and dropped for good
//! whenever the table grows.
//!
//! The table is driven by caller-supplied policies: a [`KeyHasher`] and a
//! [`KeyEq`]. See the [`hash`](crate::hash) module for ready-made ones.

use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;

use crate::error::TryReserveError;
use crate::hash::KeyEq;
use crate::hash::KeyHasher;

mod probe;
mod slot_store;

use probe::Probe;
use slot_store::Slot;
use slot_store::SlotStore;

/// Number of slots allocated by [`HashTable::new`] and by the first growth of
/// a freed table.
pub const MIN_CAPACITY: usize = 8;

/// Returns `true` if inserting one more key into a table holding `len` keys
/// would reach the 3/4 load limit.
#[inline(always)]
fn exceeds_load_limit(len: usize, capacity: usize) -> bool {
    (len as u128 + 1) * 4 >= capacity as u128 * 3
}

/// Smallest power-of-two slot count (at least [`MIN_CAPACITY`]) that holds
/// `len` keys without reaching the load limit.
fn capacity_for(len: usize) -> Result<usize, TryReserveError> {
    let min_slots = len
        .checked_mul(4)
        .map(|n| n / 3 + 1)
        .ok_or(TryReserveError::CapacityOverflow)?;

    min_slots
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(TryReserveError::CapacityOverflow)
}

/// Debug statistics for hash table analysis.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries.
    pub populated: usize,
    /// Total number of slots.
    pub capacity: usize,
    /// Number of slots holding a live entry.
    pub filled_slots: usize,
    /// Number of tombstoned slots.
    pub tombstones: usize,
    /// Number of never-used (or cleared) slots.
    pub empty_slots: usize,
    /// `populated / capacity`.
    pub load_factor: f64,
    /// Longest distance between an entry and its home slot.
    pub max_probe_length: usize,
    /// Bytes held by the slot store.
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} filled, {} tombstones, {} empty",
            self.filled_slots, self.tombstones, self.empty_slots
        );
        println!("Longest probe: {}", self.max_probe_length);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// Distribution of probe lengths over the live entries of a table.
///
/// Bin `d` counts the entries stored `d` slots past their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeHistogram {
    bins: alloc::vec::Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// The per-distance counts, starting at distance zero.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            if let Some(ch) = partial {
                bar.push(ch);
            }
            bar
        };

        for (distance, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// An open-addressing hash table mapping `K` to `V`.
///
/// Hashing and equality come from the `H` and `E` policies given at
/// construction. Any `Fn(&K) -> u64` and `Fn(&K, &K) -> bool` will do.
///
/// ## Layout
///
/// - `capacity` is zero (after [`free`](Self::free)) or a power of two no
///   smaller than [`MIN_CAPACITY`].
/// - The table grows before an insertion of a new key would bring the load
///   factor to 3/4. Growth doubles the slot count and rehashes every live
///   entry, compacting tombstones away.
/// - The table never shrinks on its own.
///
/// ## Example
///
/// ```rust
/// use chest::HashTable;
/// use chest::hash::fmix64;
///
/// let mut table = HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
/// assert_eq!(table.capacity(), 8);
///
/// table.put(1, "a").unwrap();
/// table.put(2, "b").unwrap();
/// assert_eq!(table.remove(&1), Some("a"));
///
/// assert_eq!(table.get(&1), None);
/// assert_eq!(table.get(&2), Some(&"b"));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, H, E> {
    slots: SlotStore<K, V>,
    len: usize,
    tombstones: usize,
    hasher: H,
    eq: E,
}

impl<K, V, H, E> Debug for HashTable<K, V, H, E>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H, E> HashTable<K, V, H, E> {
    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the table.
    ///
    /// This is zero for a freed table and a power of two otherwise. Fewer
    /// than three quarters of the slots ever hold live entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the hashing policy.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the equality policy.
    pub fn key_eq(&self) -> &E {
        &self.eq
    }

    /// Removes every entry, keeping the allocated slots.
    ///
    /// All slots, tombstones included, are reset to empty. Keys and values
    /// are dropped.
    ///
    /// ```rust
    /// # use chest::HashTable;
    /// # use chest::hash::fmix64;
    /// let mut table = HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
    /// for i in 0..20 {
    ///     table.put(i, i).unwrap();
    /// }
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.slots.reset();
        self.len = 0;
        self.tombstones = 0;
    }

    /// Releases the slot store, leaving a table with capacity zero.
    ///
    /// The table stays usable: the next insertion allocates
    /// [`MIN_CAPACITY`] slots again.
    pub fn free(&mut self) {
        self.slots = SlotStore::unallocated();
        self.len = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over the live entries in slot order.
    ///
    /// The order is the physical layout of the table, not insertion order,
    /// and changes whenever the table grows.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.slots().iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the live entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.slots_mut().iter_mut(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Removes and yields every entry, leaving the table empty with its
    /// capacity unchanged.
    ///
    /// Entries not consumed before the iterator is dropped are dropped with
    /// it. The counts are updated slot by slot, so a leaked iterator leaves
    /// the table consistent, holding whatever it had not reached yet.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            slots: self.slots.slots_mut().iter_mut(),
            len: &mut self.len,
            tombstones: &mut self.tombstones,
        }
    }
}

impl<K, V, H, E> HashTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEq<K>,
{
    /// Creates a table with [`MIN_CAPACITY`] slots.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error)
    /// if the initial slots cannot be allocated. Use
    /// [`try_new`](Self::try_new) to handle that case.
    pub fn new(hasher: H, eq: E) -> Self {
        Self::try_new(hasher, eq).unwrap_or_else(|err| err.handle())
    }

    /// Creates a table with [`MIN_CAPACITY`] slots, reporting allocation
    /// failure.
    pub fn try_new(hasher: H, eq: E) -> Result<Self, TryReserveError> {
        Self::try_with_capacity(0, hasher, eq)
    }

    /// Creates a table that can hold at least `capacity` entries without
    /// growing.
    ///
    /// ```rust
    /// # use chest::HashTable;
    /// # use chest::hash::fmix64;
    /// let table: HashTable<u64, (), _, _> =
    ///     HashTable::with_capacity(100, |k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn with_capacity(capacity: usize, hasher: H, eq: E) -> Self {
        Self::try_with_capacity(capacity, hasher, eq).unwrap_or_else(|err| err.handle())
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize, hasher: H, eq: E) -> Result<Self, TryReserveError> {
        let slots = SlotStore::try_allocate(capacity_for(capacity)?)?;
        Ok(Self {
            slots,
            len: 0,
            tombstones: 0,
            hasher,
            eq,
        })
    }

    #[inline]
    fn probe(&self, key: &K) -> Probe {
        let hash = self.hasher.hash_key(key);
        probe::probe(&self.slots, &self.eq, hash, key)
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// ```rust
    /// # use chest::HashTable;
    /// # use chest::hash::fmix64;
    /// let mut table = HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
    /// table.put(1, "a").unwrap();
    /// assert_eq!(table.get(&1), Some(&"a"));
    /// assert_eq!(table.get(&2), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    ///
    /// The stored key is the one given to the insertion that created the
    /// entry; later overwrites keep it.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match self.probe(key) {
            Probe::Found(index) => self.slots.slot(index).as_filled(),
            Probe::Vacant { .. } | Probe::Exhausted => None,
        }
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found(index) => self.slots.slot_mut(index).as_filled_mut().map(|(_, v)| v),
            Probe::Vacant { .. } | Probe::Exhausted => None,
        }
    }

    /// Returns `true` if the table holds an entry for `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Inserts or overwrites the value for `key`.
    ///
    /// Returns the previous value if the key was present; its stored key is
    /// kept and `key` is dropped. Inserting a new key may grow the table
    /// first. If that growth cannot allocate, the error is returned and the
    /// table is left exactly as it was.
    ///
    /// ```rust
    /// # use chest::HashTable;
    /// # use chest::hash::fmix64;
    /// let mut table = HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
    /// assert_eq!(table.put(37, "a"), Ok(None));
    /// assert_eq!(table.put(37, "b"), Ok(Some("a")));
    /// assert_eq!(table.get(&37), Some(&"b"));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, TryReserveError> {
        Ok(match self.entry(key)? {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        })
    }

    /// Gets the entry for `key`, for in-place insertion or update.
    ///
    /// The key is hashed once. If it is absent and one more entry would
    /// reach the load limit, the table grows before the vacant entry is
    /// returned, so a growth failure is reported here and never on
    /// [`VacantEntry::insert`]. The growth stands even if the vacant entry
    /// is then discarded through [`VacantEntry::into_key`], as in hashbrown.
    ///
    /// ```rust
    /// # use chest::HashTable;
    /// # use chest::hash::fmix64;
    /// let mut counts = HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
    /// for word in [3, 1, 3, 3] {
    ///     *counts.entry(word).unwrap().or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get(&3), Some(&3));
    /// assert_eq!(counts.get(&1), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V>, TryReserveError> {
        let hash = self.hasher.hash_key(&key);
        let mut located = probe::probe(&self.slots, &self.eq, hash, &key);

        if let Probe::Found(index) = located {
            return Ok(Entry::Occupied(OccupiedEntry {
                slot: self.slots.slot_mut(index),
                len: &mut self.len,
                tombstones: &mut self.tombstones,
            }));
        }

        if self.capacity() == 0 || exceeds_load_limit(self.len, self.capacity()) {
            self.grow()?;
            located = probe::probe(&self.slots, &self.eq, hash, &key);
        }

        match located {
            Probe::Vacant { index, tombstone } => Ok(Entry::Vacant(VacantEntry {
                key,
                tombstone,
                slot: self.slots.slot_mut(index),
                len: &mut self.len,
                tombstones: &mut self.tombstones,
            })),
            Probe::Found(_) | Probe::Exhausted => {
                unreachable!("probe cycle exhausted below the load limit")
            }
        }
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// The slot becomes a tombstone; the table never shrinks.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        match self.probe(key) {
            Probe::Found(index) => {
                let removed = mem::replace(self.slots.slot_mut(index), Slot::Tombstone);
                self.len -= 1;
                self.tombstones += 1;
                removed.into_filled()
            }
            Probe::Vacant { .. } | Probe::Exhausted => None,
        }
    }

    /// Reserves room for at least `additional` more entries without further
    /// growth.
    ///
    /// Rehashes into the smallest sufficient power-of-two store if the
    /// current one is too small. On failure the table is unchanged.
    ///
    /// ```rust
    /// # use chest::HashTable;
    /// # use chest::error::TryReserveError;
    /// # use chest::hash::fmix64;
    /// let mut table: HashTable<u64, u64, _, _> =
    ///     HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
    /// table.reserve(1000).unwrap();
    /// assert_eq!(table.capacity(), 2048);
    ///
    /// assert_eq!(table.reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    /// assert_eq!(table.capacity(), 2048);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let capacity = capacity_for(required)?;
        if capacity > self.capacity() {
            self.resize(capacity)?;
        }
        Ok(())
    }

    /// Doubles the slot count, or allocates [`MIN_CAPACITY`] slots for a
    /// freed table.
    #[cold]
    #[inline(never)]
    fn grow(&mut self) -> Result<(), TryReserveError> {
        let capacity = match self.capacity() {
            0 => MIN_CAPACITY,
            n => n.checked_mul(2).ok_or(TryReserveError::CapacityOverflow)?,
        };
        self.resize(capacity)
    }

    /// Rehashes every live entry into a fresh store of `capacity` slots.
    ///
    /// The new store is allocated before anything is touched, so an
    /// allocation failure leaves the table as it was. Tombstones are not
    /// carried over.
    fn resize(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(!exceeds_load_limit(self.len.saturating_sub(1), capacity));

        let mut slots = SlotStore::try_allocate(capacity).inspect_err(|err| {
            log::debug!(
                "hash table growth from {} to {} slots failed: {}",
                self.capacity(),
                capacity,
                err
            );
        })?;

        let old = mem::replace(&mut self.slots, SlotStore::unallocated());
        let old_capacity = old.capacity();
        let live = mem::take(&mut self.len);
        let dropped = mem::take(&mut self.tombstones);

        let mut migrated = 0;
        for (key, value) in old.into_filled() {
            let hash = self.hasher.hash_key(&key);
            match probe::probe(&slots, &self.eq, hash, &key) {
                Probe::Vacant { index, .. } => slots.fill(index, key, value),
                Probe::Found(_) | Probe::Exhausted => {
                    unreachable!("rehash found a duplicate key or no free slot")
                }
            }
            migrated += 1;
        }
        debug_assert_eq!(migrated, live);

        self.slots = slots;
        self.len = migrated;

        log::trace!(
            "hash table grew from {old_capacity} to {capacity} slots: {migrated} entries migrated, {dropped} tombstones dropped"
        );
        Ok(())
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut bins = alloc::vec::Vec::new();
        let capacity = self.capacity();

        for (index, slot) in self.slots.slots().iter().enumerate() {
            if let Some((key, _)) = slot.as_filled() {
                let home = probe::home_index(self.hasher.hash_key(key), capacity);
                let distance = index.wrapping_sub(home) & (capacity - 1);
                if bins.len() <= distance {
                    bins.resize(distance + 1, 0);
                }
                bins[distance] += 1;
            }
        }

        ProbeHistogram { bins }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut filled_slots = 0;
        let mut tombstones = 0;
        let mut empty_slots = 0;
        for slot in self.slots.slots() {
            match slot {
                Slot::Empty => empty_slots += 1,
                Slot::Filled { .. } => filled_slots += 1,
                Slot::Tombstone => tombstones += 1,
            }
        }

        DebugStats {
            populated: self.len,
            capacity: self.capacity(),
            filled_slots,
            tombstones,
            empty_slots,
            load_factor: if self.capacity() == 0 {
                0.0
            } else {
                self.len as f64 / self.capacity() as f64
            },
            max_probe_length: self.probe_histogram().bins().len().saturating_sub(1),
            total_bytes: self.slots.allocated_bytes(),
        }
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a HashTable<K, V, H, E> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a mut HashTable<K, V, H, E> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry of a [`HashTable`], which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, K, V> {
    /// The key is present in the table.
    Occupied(OccupiedEntry<'a, K, V>),
    /// The key is absent; room for it has already been made.
    Vacant(VacantEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Modifies the value in place if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the key of this entry.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A vacant entry: the key is absent and a slot has been chosen for it.
pub struct VacantEntry<'a, K, V> {
    key: K,
    tombstone: bool,
    slot: &'a mut Slot<K, V>,
    len: &'a mut usize,
    tombstones: &'a mut usize,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Gives back the key without inserting.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` under the entry's key and returns a mutable reference
    /// to it.
    pub fn insert(self, value: V) -> &'a mut V {
        if self.tombstone {
            *self.tombstones -= 1;
        }
        *self.len += 1;

        let slot = self.slot;
        *slot = Slot::Filled {
            key: self.key,
            value,
        };
        match slot {
            Slot::Filled { value, .. } => value,
            Slot::Empty | Slot::Tombstone => unreachable!(),
        }
    }
}

/// An occupied entry: the key is present.
pub struct OccupiedEntry<'a, K, V> {
    slot: &'a mut Slot<K, V>,
    len: &'a mut usize,
    tombstones: &'a mut usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    fn filled(&self) -> (&K, &V) {
        match self.slot.as_filled() {
            Some(kv) => kv,
            None => unreachable!("occupied entry over a vacant slot"),
        }
    }

    /// Returns the stored key.
    pub fn key(&self) -> &K {
        self.filled().0
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        self.filled().1
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        match self.slot.as_filled_mut() {
            Some((_, value)) => value,
            None => unreachable!("occupied entry over a vacant slot"),
        }
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let slot = self.slot;
        match slot.as_filled_mut() {
            Some((_, value)) => value,
            None => unreachable!("occupied entry over a vacant slot"),
        }
    }

    /// Replaces the value, returning the old one. The stored key is kept.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Tombstones the entry and returns its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Tombstones the entry and returns its key and value.
    pub fn remove_entry(self) -> (K, V) {
        *self.len -= 1;
        *self.tombstones += 1;
        match mem::replace(self.slot, Slot::Tombstone).into_filled() {
            Some(kv) => kv,
            None => unreachable!("occupied entry over a vacant slot"),
        }
    }
}

/// An iterator over the entries of a [`HashTable`] in slot order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
#[derive(Clone)]
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.slots.by_ref().find_map(Slot::as_filled)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`HashTable`] in slot order.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.slots.by_ref().find_map(Slot::as_filled_mut)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a [`HashTable`].
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`HashTable`].
#[derive(Clone)]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. Every
/// slot it passes is reset to empty, and dropping it finishes the job.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    len: &'a mut usize,
    tombstones: &'a mut usize,
}

impl<K, V> Drain<'_, K, V> {
    /// Empties one slot, keeping the table's counts in step with it.
    fn take_slot(&mut self, slot: &mut Slot<K, V>) -> Option<(K, V)> {
        match mem::replace(slot, Slot::Empty) {
            Slot::Filled { key, value } => {
                *self.len -= 1;
                Some((key, value))
            }
            Slot::Tombstone => {
                *self.tombstones -= 1;
                None
            }
            Slot::Empty => None,
        }
    }
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.next() {
            if let Some(kv) = self.take_slot(slot) {
                return Some(kv);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.len, Some(*self.len))
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        while let Some(slot) = self.slots.next() {
            self.take_slot(slot);
        }
    }
}
