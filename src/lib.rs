#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

/// A growable contiguous sequence with doubling growth and fallible
/// allocation.
pub mod dyn_array;

/// Error types shared by the containers.
pub mod error;

pub mod hash;

/// A `Hash + Eq` map over [`HashTable`].
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// A singly linked list with O(1) insertion at both ends.
pub mod linked_list;

pub use dyn_array::DynArray;
pub use error::InsertError;
pub use error::TryReserveError;
pub use hash_map::HashMap;
pub use hash_table::Entry;
pub use hash_table::HashTable;
pub use linked_list::LinkedList;
