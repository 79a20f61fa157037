use super::slot_store::Slot;
use super::slot_store::SlotStore;
use crate::hash::KeyEq;

/// Outcome of a linear probe for one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key is stored at this index.
    Found(usize),
    /// The key is absent; this is where it should be inserted. `tombstone` is
    /// set when the slot is a reused tombstone rather than an empty slot.
    Vacant { index: usize, tombstone: bool },
    /// The key is absent and a full cycle found neither an empty slot nor a
    /// tombstone. Also returned for a store with no slots.
    Exhausted,
}

/// Home slot of `hash` in a store of `capacity` slots (a power of two).
#[inline(always)]
pub(crate) fn home_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}

/// Walks the probe sequence of `hash` looking for `key`.
///
/// The scan starts at the home slot and moves forward one slot at a time,
/// wrapping around, for at most `capacity` slots:
///
/// - an `Empty` slot ends the sequence: the key is absent and the first
///   tombstone passed on the way (if any) is preferred as insertion point;
/// - a `Tombstone` is remembered if it is the first one, and skipped;
/// - a `Filled` slot whose key matches ends the scan.
pub(crate) fn probe<K, V, E>(store: &SlotStore<K, V>, eq: &E, hash: u64, key: &K) -> Probe
where
    E: KeyEq<K> + ?Sized,
{
    let capacity = store.capacity();
    if capacity == 0 {
        return Probe::Exhausted;
    }

    let mask = capacity - 1;
    let slots = store.slots();
    let mut index = home_index(hash, capacity);
    let mut first_tombstone = None;

    for _ in 0..capacity {
        match &slots[index] {
            Slot::Empty => {
                return match first_tombstone {
                    Some(tombstone) => Probe::Vacant {
                        index: tombstone,
                        tombstone: true,
                    },
                    None => Probe::Vacant {
                        index,
                        tombstone: false,
                    },
                };
            }
            Slot::Tombstone => {
                if first_tombstone.is_none() {
                    first_tombstone = Some(index);
                }
            }
            Slot::Filled { key: stored, .. } => {
                if eq.key_eq(stored, key) {
                    return Probe::Found(index);
                }
            }
        }

        index = (index + 1) & mask;
    }

    match first_tombstone {
        Some(index) => Probe::Vacant {
            index,
            tombstone: true,
        },
        None => Probe::Exhausted,
    }
}
