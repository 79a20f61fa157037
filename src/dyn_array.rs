use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Index;
use core::ops::IndexMut;

use crate::error::InsertError;
use crate::error::TryReserveError;

/// Capacity of the first allocation made by a growing operation on an empty
/// array.
pub const MIN_CAPACITY: usize = 8;

/// A growable, contiguous array of `T`.
///
/// Capacity is managed explicitly: a full array grows from zero to
/// [`MIN_CAPACITY`] and doubles from then on, and every growing operation
/// reports allocation failure instead of aborting. A failed operation leaves
/// the array as it was.
///
/// # Examples
///
/// ```rust
/// use chest::DynArray;
///
/// let mut array = DynArray::new();
/// assert_eq!(array.capacity(), 0);
///
/// array.push(3).unwrap();
/// array.push(1).unwrap();
/// array.insert(1, 2).unwrap();
/// assert_eq!(array.as_slice(), [3, 2, 1]);
/// assert_eq!(array.capacity(), 8);
///
/// array[0] = 4;
/// assert_eq!(array.remove_at(0), Some(4));
/// assert_eq!(array.index_of(&1), Some(1));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DynArray<T> {
    items: Vec<T>,
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for DynArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> DynArray<T> {
    /// Creates an empty array without allocating.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty array with room for exactly `capacity` items.
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut array = Self::new();
        array.reserve(capacity)?;
        Ok(array)
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the array holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items the array can hold without growing.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Ensures the array can hold `new_capacity` items in total.
    ///
    /// Does nothing if the capacity is already large enough; never shrinks.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        let old = self.items.capacity();
        if new_capacity <= old {
            return Ok(());
        }

        let additional = new_capacity - self.items.len();
        if self.items.try_reserve_exact(additional).is_err() {
            let err = match core::alloc::Layout::array::<T>(new_capacity) {
                Ok(layout) => TryReserveError::AllocError { layout },
                Err(_) => TryReserveError::CapacityOverflow,
            };
            log::debug!("dyn array reserve of {new_capacity} items failed: {err}");
            return Err(err);
        }

        log::trace!(
            "dyn array capacity {old} -> {} ({} items)",
            self.items.capacity(),
            self.items.len()
        );
        Ok(())
    }

    /// Grows by the doubling rule if there is no room for one more item.
    fn grow_for_one(&mut self) -> Result<(), TryReserveError> {
        let capacity = self.items.capacity();
        if self.items.len() < capacity {
            return Ok(());
        }

        let new_capacity = if capacity == 0 {
            MIN_CAPACITY
        } else {
            capacity
                .checked_mul(2)
                .ok_or(TryReserveError::CapacityOverflow)?
        };
        self.reserve(new_capacity)
    }

    /// Appends an item, growing if full.
    ///
    /// On failure the item is dropped and the array is unchanged.
    pub fn push(&mut self, item: T) -> Result<(), TryReserveError> {
        self.grow_for_one()?;
        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the last item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Inserts `item` at `index`, shifting later items one place right.
    ///
    /// `index == len()` appends. The item is returned inside the error if the
    /// index is out of bounds or growing fails.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), InsertError<T>> {
        let len = self.items.len();
        if index > len {
            return Err(InsertError::OutOfBounds { index, len, item });
        }
        if let Err(err) = self.grow_for_one() {
            return Err(InsertError::Alloc(err, item));
        }
        self.items.insert(index, item);
        Ok(())
    }

    /// Removes the item at `index`, shifting later items one place left.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Returns the item at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the item at `index` mutably, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Returns the first item.
    pub fn front(&self) -> Option<&T> {
        self.items.first()
    }

    /// Returns the last item.
    pub fn back(&self) -> Option<&T> {
        self.items.last()
    }

    /// Swaps the items at `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }

    /// Drops every item, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drops every item and releases the allocation.
    pub fn free(&mut self) {
        self.items = Vec::new();
    }

    /// Returns the items as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Returns an iterator over the items, front to back.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns an iterator over the items that allows modifying each one.
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T: Default> DynArray<T> {
    /// Sets the length to `new_len`.
    ///
    /// Growing reserves exactly `new_len` slots (if needed) and fills the new
    /// tail with `T::default()`; shrinking drops the excess items but keeps
    /// the capacity.
    pub fn resize(&mut self, new_len: usize) -> Result<(), TryReserveError> {
        self.reserve(new_len)?;
        self.items.resize_with(new_len, T::default);
        Ok(())
    }
}

impl<T: PartialEq> DynArray<T> {
    /// Returns the index of the first item equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|x| x == item)
    }

    /// Returns `true` if some item equals `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T> Index<usize> for DynArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for DynArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> IntoIterator for DynArray<T> {
    type IntoIter = alloc::vec::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type IntoIter = core::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type IntoIter = core::slice::IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Extend<T> for DynArray<T> {
    /// # Panics
    ///
    /// Panics on capacity overflow; aborts if the allocator fails.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(err) = self.push(item) {
                err.handle();
            }
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn new_does_not_allocate() {
        let array: DynArray<u64> = DynArray::new();
        assert_eq!(array.capacity(), 0);
        assert!(array.is_empty());
        assert_eq!(array.front(), None);
        assert_eq!(array.back(), None);
    }

    #[test]
    fn push_grows_from_eight_by_doubling() {
        let mut array = DynArray::new();
        array.push(0u32).unwrap();
        assert_eq!(array.capacity(), MIN_CAPACITY);
        assert_eq!(MIN_CAPACITY, 8);

        for i in 1..8 {
            array.push(i).unwrap();
        }
        assert_eq!(array.capacity(), 8);

        array.push(8).unwrap();
        assert_eq!(array.capacity(), 16);
        assert_eq!(array.len(), 9);
        assert_eq!(array.front(), Some(&0));
        assert_eq!(array.back(), Some(&8));
    }

    #[test]
    fn reserve_never_shrinks() {
        let mut array: DynArray<u8> = DynArray::with_capacity(32).unwrap();
        assert_eq!(array.capacity(), 32);
        array.reserve(4).unwrap();
        assert_eq!(array.capacity(), 32);
    }

    #[test]
    fn reserve_overflow_leaves_array_unchanged() {
        let mut array: DynArray<u64> = [1, 2, 3].into_iter().collect();
        let capacity = array.capacity();
        assert_eq!(
            array.reserve(usize::MAX),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(array.as_slice(), [1, 2, 3]);
        assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn resize_fills_with_default_and_truncates() {
        let mut array: DynArray<String> = DynArray::new();
        array.resize(3).unwrap();
        assert_eq!(array.as_slice(), ["", "", ""]);
        assert_eq!(array.capacity(), 3);

        array[1] = "x".to_string();
        array.resize(2).unwrap();
        assert_eq!(array.as_slice(), ["", "x"]);
        assert_eq!(array.capacity(), 3);
    }

    #[test]
    fn insert_and_remove_shift_items() {
        let mut array: DynArray<char> = "acd".chars().collect();
        array.insert(1, 'b').unwrap();
        array.insert(4, 'e').unwrap();
        assert_eq!(array.as_slice(), ['a', 'b', 'c', 'd', 'e']);

        assert_eq!(array.remove_at(0), Some('a'));
        assert_eq!(array.remove_at(9), None);
        assert_eq!(array.as_slice(), ['b', 'c', 'd', 'e']);
    }

    #[test]
    fn insert_out_of_bounds_returns_item() {
        let mut array: DynArray<String> = DynArray::new();
        let err = array.insert(1, "lost".to_string()).unwrap_err();
        assert!(matches!(
            err,
            InsertError::OutOfBounds { index: 1, len: 0, .. }
        ));
        assert_eq!(err.into_item(), "lost");
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn search_swap_and_access() {
        let mut array: DynArray<i32> = vec![5, 6, 7, 6].into_iter().collect();
        assert_eq!(array.index_of(&6), Some(1));
        assert_eq!(array.index_of(&9), None);
        assert!(array.contains(&7));

        array.swap(0, 3);
        assert_eq!(array.as_slice(), [6, 6, 7, 5]);

        *array.get_mut(2).unwrap() += 1;
        for x in &mut array {
            *x *= 10;
        }
        assert_eq!(array.get(2), Some(&80));
        assert_eq!(array.get(4), None);
        assert_eq!(array.pop(), Some(50));
    }

    #[test]
    fn clear_keeps_capacity_and_free_releases() {
        let mut array: DynArray<u16> = (0..20).collect();
        let capacity = array.capacity();
        assert_eq!(capacity, 32);

        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), capacity);

        array.free();
        assert_eq!(array.capacity(), 0);
        array.push(1).unwrap();
        assert_eq!(array.capacity(), 8);
    }

    #[test]
    fn into_iter_and_debug() {
        let array: DynArray<u8> = [1, 2].into_iter().collect();
        assert_eq!(alloc::format!("{array:?}"), "[1, 2]");
        assert_eq!(array.into_iter().sum::<u8>(), 3);
    }
}
