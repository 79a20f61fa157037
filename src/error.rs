use core::alloc::Layout;
use core::fmt;

/// The error type for operations that need to allocate a new backing store.
///
/// A failed reservation never mutates the container it was called on: the
/// previous store, capacity and length remain valid.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The requested capacity exceeds what can be addressed or described by a
    /// [`Layout`].
    CapacityOverflow,

    /// The allocator returned an error for the given layout.
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

impl TryReserveError {
    /// Converts the error into a panic (capacity overflow) or an allocator
    /// abort (allocation error), for infallible wrappers.
    #[cold]
    pub(crate) fn handle(self) -> ! {
        match self {
            TryReserveError::CapacityOverflow => panic!("capacity overflow"),
            TryReserveError::AllocError { layout } => {
                alloc::alloc::handle_alloc_error(layout)
            }
        }
    }
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryReserveError::CapacityOverflow => {
                f.write_str("memory allocation failed because the computed capacity exceeded the collection's maximum")
            }
            TryReserveError::AllocError { layout } => write!(
                f,
                "memory allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl core::error::Error for TryReserveError {}

/// The error returned by [`DynArray::insert`](crate::dyn_array::DynArray::insert).
///
/// The rejected item is handed back to the caller in both variants.
#[derive(PartialEq, Eq)]
pub enum InsertError<T> {
    /// The index was greater than the length of the array.
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the array at the time of the call.
        len: usize,
        /// The item that was not inserted.
        item: T,
    },
    /// Growing the array to make room failed.
    Alloc(TryReserveError, T),
}

impl<T> InsertError<T> {
    /// Returns the item that could not be inserted.
    pub fn into_item(self) -> T {
        match self {
            InsertError::OutOfBounds { item, .. } | InsertError::Alloc(_, item) => item,
        }
    }
}

impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::OutOfBounds { index, len, .. } => f
                .debug_struct("OutOfBounds")
                .field("index", index)
                .field("len", len)
                .finish_non_exhaustive(),
            InsertError::Alloc(err, _) => f.debug_tuple("Alloc").field(err).finish(),
        }
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::OutOfBounds { index, len, .. } => {
                write!(f, "insertion index (is {index}) should be <= len (is {len})")
            }
            InsertError::Alloc(err, _) => fmt::Display::fmt(err, f),
        }
    }
}

impl<T> core::error::Error for InsertError<T> {}
