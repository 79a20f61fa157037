use alloc::vec::Vec;
use core::alloc::Layout;

use crate::error::TryReserveError;

/// One entry of the open-addressing array.
///
/// The variant is the occupancy tag: a fresh store is all `Empty`, `remove`
/// turns a `Filled` slot into a `Tombstone` so probe sequences running through
/// it stay intact, and a rehash drops tombstones entirely.
#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Filled { key: K, value: V },
    Tombstone,
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn as_filled(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Filled { key, value } => Some((key, value)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_filled_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Filled { key, value } => Some((&*key, value)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_filled(self) -> Option<(K, V)> {
        match self {
            Slot::Filled { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

/// Contiguous, exclusively owned array of slots.
///
/// A store is never resized in place: growth allocates a whole new store and
/// the old one is consumed by the rehash.
#[derive(Clone)]
pub(crate) struct SlotStore<K, V> {
    slots: Vec<Slot<K, V>>,
}

impl<K, V> SlotStore<K, V> {
    /// A store with no backing memory and a capacity of zero.
    pub(crate) const fn unallocated() -> Self {
        Self { slots: Vec::new() }
    }

    /// Allocates `capacity` slots, all tagged `Empty`.
    ///
    /// On failure nothing has been allocated and the error describes the
    /// rejected request.
    pub(crate) fn try_allocate(capacity: usize) -> Result<Self, TryReserveError> {
        let layout =
            Layout::array::<Slot<K, V>>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;

        #[cfg(test)]
        if fail_alloc::take() {
            return Err(TryReserveError::AllocError { layout });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TryReserveError::AllocError { layout })?;
        slots.resize_with(capacity, || Slot::Empty);

        Ok(Self { slots })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn slot(&self, index: usize) -> &Slot<K, V> {
        &self.slots[index]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<K, V> {
        &mut self.slots[index]
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    /// Writes a live entry into `index`, overwriting whatever tag it had.
    #[inline]
    pub(crate) fn fill(&mut self, index: usize, key: K, value: V) {
        self.slots[index] = Slot::Filled { key, value };
    }

    /// Resets every tag to `Empty` without touching the allocation.
    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
    }

    /// Consumes the store, yielding its live entries in slot order.
    pub(crate) fn into_filled(self) -> impl Iterator<Item = (K, V)> {
        self.slots.into_iter().filter_map(Slot::into_filled)
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.slots.capacity() * core::mem::size_of::<Slot<K, V>>()
    }
}
