//! Combined state: a record of independently owned, type-erased slices.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One slice of combined state. Slices are shared, not copied, between
/// successive states; pointer identity is the change-detection signal.
pub type DynSlice = Arc<dyn Any + Send + Sync>;

/// A plain record of named state slices, the state shape produced by
/// [`crate::combine_reducers`].
///
/// The record itself is behind an `Arc`, so cloning a `StateMap` is O(1)
/// and [`StateMap::ptr_eq`] observes whether two values are the same
/// record: the combinator returns the prior record unchanged when no
/// slice changed, which lets downstream change detection short-circuit.
#[derive(Clone, Default)]
pub struct StateMap {
    slices: Arc<BTreeMap<String, DynSlice>>,
}

impl StateMap {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a slice, returning the updated record. Intended
    /// for building preloaded state; each call may copy the record, so
    /// this is not for use on a hot path.
    pub fn with_slice<T: Send + Sync + 'static>(
        mut self,
        key: impl Into<String>,
        value: T,
    ) -> Self {
        Arc::make_mut(&mut self.slices).insert(key.into(), Arc::new(value) as DynSlice);
        self
    }

    /// Typed access to a slice. Returns `None` when the key is absent or
    /// holds a different type.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.slices
            .get(key)
            .cloned()
            .and_then(|slice| slice.downcast::<T>().ok())
    }

    /// True when both values are the identical record, not merely equal
    /// contents.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slices, &other.slices)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&DynSlice> {
        self.slices.get(key)
    }

    pub(crate) fn from_map(slices: BTreeMap<String, DynSlice>) -> Self {
        Self {
            slices: Arc::new(slices),
        }
    }
}

impl std::fmt::Debug for StateMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.slices.keys()).finish()
    }
}
