use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use slotmap::SecondaryMap;
use slotmap::SlotMap;
use slotmap::new_key_type;

new_key_type! {
    struct NodeKey;
}

#[derive(Clone)]
struct Node<T> {
    value: T,
    next: Option<NodeKey>,
}

/// A singly linked list with head and tail links.
///
/// Nodes live in a [`SlotMap`] arena and link to their successor by key, so
/// the list owns all of its nodes and never hands out dangling links.
/// Insertion at either end and removal at the front are O(1); positional
/// access and removal at the back walk the list from the head.
///
/// # Examples
///
/// ```rust
/// use chest::LinkedList;
///
/// let mut list = LinkedList::new();
/// list.push_back(2);
/// list.push_back(3);
/// list.push_front(1);
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
///
/// assert_eq!(list.remove_at(1), Some(2));
/// assert_eq!(list.pop_front(), Some(1));
/// assert_eq!(list.back(), Some(&3));
/// ```
#[derive(Clone)]
pub struct LinkedList<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T> LinkedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Inserts `value` before the head.
    pub fn push_front(&mut self, value: T) {
        let key = self.nodes.insert(Node {
            value,
            next: self.head,
        });
        self.head = Some(key);
        if self.tail.is_none() {
            self.tail = Some(key);
        }
    }

    /// Appends `value` after the tail.
    pub fn push_back(&mut self, value: T) {
        let key = self.nodes.insert(Node { value, next: None });
        match self.tail.and_then(|tail| self.nodes.get_mut(tail)) {
            Some(tail) => tail.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
    }

    /// Returns the first item.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|key| self.nodes.get(key)).map(|n| &n.value)
    }

    /// Returns the last item.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|key| self.nodes.get(key)).map(|n| &n.value)
    }

    fn key_at(&self, index: usize) -> Option<NodeKey> {
        let mut cursor = self.head;
        for _ in 0..index {
            cursor = self.nodes.get(cursor?)?.next;
        }
        cursor
    }

    /// Returns the item at `index`, walking from the head.
    pub fn get(&self, index: usize) -> Option<&T> {
        let key = self.key_at(index)?;
        self.nodes.get(key).map(|n| &n.value)
    }

    /// Returns the item at `index` mutably, walking from the head.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let key = self.key_at(index)?;
        self.nodes.get_mut(key).map(|n| &mut n.value)
    }

    /// Removes and returns the head.
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.nodes.remove(self.head?)?;
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        Some(node.value)
    }

    /// Removes and returns the tail.
    ///
    /// There are no back links, so this walks to the tail's predecessor.
    pub fn pop_back(&mut self) -> Option<T> {
        match self.len() {
            0 => None,
            1 => self.pop_front(),
            len => self.unlink_after(len - 2),
        }
    }

    /// Removes the item at `index`, returning `None` if out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        match index {
            0 => self.pop_front(),
            _ => self.unlink_after(index - 1),
        }
    }

    /// Unlinks the successor of the node at `prev_index`.
    fn unlink_after(&mut self, prev_index: usize) -> Option<T> {
        let prev_key = self.key_at(prev_index)?;
        let target = self.nodes.get(prev_key)?.next?;

        let node = self.nodes.remove(target)?;
        if let Some(prev) = self.nodes.get_mut(prev_key) {
            prev.next = node.next;
        }
        if self.tail == Some(target) {
            self.tail = Some(prev_key);
        }
        Some(node.value)
    }

    /// Drops every item, keeping the arena's allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Drops every item and releases the arena.
    pub fn free(&mut self) {
        *self = Self::new();
    }

    /// Returns an iterator over the items, head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            next: self.head,
            remaining: self.len(),
        }
    }

    /// Returns an iterator over the items that allows modifying each one.
    ///
    /// The list order is resolved up front, which costs one allocation.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let mut by_key: SecondaryMap<NodeKey, (&mut T, Option<NodeKey>)> = self
            .nodes
            .iter_mut()
            .map(|(key, node)| (key, (&mut node.value, node.next)))
            .collect();

        let mut ordered = Vec::with_capacity(by_key.len());
        let mut cursor = self.head;
        while let Some((value, next)) = cursor.and_then(|key| by_key.remove(key)) {
            ordered.push(value);
            cursor = next;
        }

        IterMut {
            inner: ordered.into_iter(),
        }
    }
}

/// Iterator over the items of a [`LinkedList`], head to tail.
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<NodeKey, Node<T>>,
    next: Option<NodeKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.next?)?;
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over the items of a [`LinkedList`], head to tail.
pub struct IterMut<'a, T> {
    inner: alloc::vec::IntoIter<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over the items of a [`LinkedList`], head to tail.
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for LinkedList<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type IntoIter = IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn collect<T: Clone>(list: &LinkedList<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn empty_list() {
        let mut list: LinkedList<u8> = LinkedList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);
        assert_eq!(list.remove_at(0), None);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn push_both_ends() {
        let mut list = LinkedList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        list.push_front(0);

        assert_eq!(collect(&list), [0, 1, 2, 3]);
        assert_eq!(list.front(), Some(&0));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.get(2), Some(&2));
        assert_eq!(list.get(4), None);
    }

    #[test]
    fn single_item_is_head_and_tail() {
        let mut list = LinkedList::new();
        list.push_front('x');
        assert_eq!(list.front(), list.back());

        assert_eq!(list.pop_back(), Some('x'));
        assert!(list.is_empty());

        list.push_back('y');
        assert_eq!(list.front(), Some(&'y'));
        assert_eq!(list.back(), Some(&'y'));
    }

    #[test]
    fn pop_back_moves_tail() {
        let mut list: LinkedList<u32> = (1..=4).collect();
        assert_eq!(list.pop_back(), Some(4));
        assert_eq!(list.back(), Some(&3));

        list.push_back(9);
        assert_eq!(collect(&list), [1, 2, 3, 9]);
    }

    #[test]
    fn remove_at_relinks() {
        let mut list: LinkedList<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();

        assert_eq!(list.remove_at(1).as_deref(), Some("b"));
        assert_eq!(list.remove_at(2).as_deref(), Some("d"));
        assert_eq!(list.back().map(String::as_str), Some("c"));
        assert_eq!(list.remove_at(2), None);

        list.push_back("e".to_string());
        assert_eq!(collect(&list), ["a", "c", "e"]);

        assert_eq!(list.remove_at(0).as_deref(), Some("a"));
        assert_eq!(list.front().map(String::as_str), Some("c"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn mutation_through_iter_mut_and_get_mut() {
        let mut list: LinkedList<i64> = vec![1, 2, 3].into_iter().collect();
        list.push_front(0);
        for value in &mut list {
            *value *= 10;
        }
        *list.get_mut(0).unwrap() = -1;
        assert_eq!(collect(&list), [-1, 10, 20, 30]);
    }

    #[test]
    fn clear_free_and_reuse() {
        let mut list: LinkedList<u8> = (0..10).collect();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.back(), None);

        list.extend([7, 8]);
        assert_eq!(collect(&list), [7, 8]);

        list.free();
        assert!(list.is_empty());
        list.push_back(1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn into_iter_debug_and_eq() {
        let list: LinkedList<u8> = [3, 1, 2].into_iter().collect();
        assert_eq!(alloc::format!("{list:?}"), "[3, 1, 2]");
        assert_eq!(list.iter().len(), 3);

        let copy = list.clone();
        assert_eq!(copy, list);
        assert_eq!(list.into_iter().collect::<Vec<_>>(), [3, 1, 2]);
    }
}
