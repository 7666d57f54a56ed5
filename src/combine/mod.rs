//! Reducer combinator: merges independent per-key slice reducers into one
//! whole-state reducer over a [`StateMap`].
//!
//! Each slice reducer owns exactly one key and never sees its siblings'
//! state. When no slice changed for a given action, the combined reducer
//! returns the prior record unchanged, so `StateMap::ptr_eq` can be used
//! downstream to skip work.

mod state_map;

pub use state_map::{DynSlice, StateMap};

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::action::{kinds, Action};
use crate::error::StoreError;
use crate::reducer::Reducer;

/// A transition function for one slice of combined state.
///
/// `None` input marks an unseeded slice; the reducer must answer it with
/// its default. A `None` **output** is a contract violation, the typed
/// analog of a reducer returning nothing, and surfaces as
/// [`StoreError::InvalidReducer`], at combination-time probing or at
/// dispatch time.
pub trait SliceReducer: Send + Sync {
    fn reduce(&self, state: Option<DynSlice>, action: &Action) -> Option<DynSlice>;
}

struct TypedSlice<T, F> {
    reduce: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> SliceReducer for TypedSlice<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(Option<Arc<T>>, &Action) -> Arc<T> + Send + Sync,
{
    fn reduce(&self, state: Option<DynSlice>, action: &Action) -> Option<DynSlice> {
        let state = state.and_then(|slice| match slice.downcast::<T>() {
            Ok(typed) => Some(typed),
            Err(_) => {
                tracing::warn!(
                    expected = std::any::type_name::<T>(),
                    "slice holds a different type; reducer will reseed from its default"
                );
                None
            }
        });
        Some((self.reduce)(state, action) as DynSlice)
    }
}

/// Adapts a typed closure into a [`SliceReducer`].
///
/// Return the input `Arc` unchanged for unhandled actions; that is what
/// keeps an untouched slice, and the combined record around it, reference
/// stable.
pub fn slice<T, F>(reduce: F) -> Box<dyn SliceReducer>
where
    T: Send + Sync + 'static,
    F: Fn(Option<Arc<T>>, &Action) -> Arc<T> + Send + Sync + 'static,
{
    Box::new(TypedSlice {
        reduce,
        _marker: PhantomData,
    })
}

/// A whole-state reducer assembled from per-key slice reducers.
pub struct CombinedReducer {
    reducers: BTreeMap<String, Box<dyn SliceReducer>>,
    shape_warned: AtomicBool,
}

/// Combines a map of key → slice reducer into a single reducer over
/// [`StateMap`].
///
/// Fails with [`StoreError::InvalidArgument`] for an empty map. Every
/// reducer is probed at combination time with the init action and with a
/// randomized unknown action; a reducer that produces no state for either
/// fails the combination with [`StoreError::InvalidReducer`] naming the
/// key. Duplicate keys keep the last entry.
pub fn combine_reducers(
    reducers: Vec<(String, Box<dyn SliceReducer>)>,
) -> Result<CombinedReducer, StoreError> {
    if reducers.is_empty() {
        return Err(StoreError::InvalidArgument(
            "combine_reducers requires at least one slice reducer".to_string(),
        ));
    }
    let reducers: BTreeMap<String, Box<dyn SliceReducer>> = reducers.into_iter().collect();
    assert_slice_defaults(&reducers)?;
    Ok(CombinedReducer {
        reducers,
        shape_warned: AtomicBool::new(false),
    })
}

/// Every slice reducer must report a default for an unseeded slice, and
/// must pass unknown actions through rather than erasing its state.
fn assert_slice_defaults(
    reducers: &BTreeMap<String, Box<dyn SliceReducer>>,
) -> Result<(), StoreError> {
    for (key, reducer) in reducers {
        for probe in [kinds::init(), kinds::probe()] {
            if reducer.reduce(None, &probe).is_none() {
                return Err(StoreError::InvalidReducer {
                    key: key.clone(),
                    kind: probe.kind().to_string(),
                });
            }
        }
    }
    Ok(())
}

impl CombinedReducer {
    /// Warning-only shape assertion: state keys with no matching reducer
    /// are reported once and dropped from the next combined record.
    fn warn_on_unexpected_keys(&self, state: &StateMap) {
        if self.shape_warned.load(Ordering::Relaxed) {
            return;
        }
        let unexpected: Vec<&str> = state
            .keys()
            .filter(|key| !self.reducers.contains_key(*key))
            .collect();
        if !unexpected.is_empty() {
            self.shape_warned.store(true, Ordering::Relaxed);
            tracing::warn!(
                keys = ?unexpected,
                "state contains keys with no matching slice reducer; they will be dropped"
            );
        }
    }
}

impl Reducer<StateMap> for CombinedReducer {
    fn reduce(&self, state: Option<StateMap>, action: &Action) -> Result<StateMap, StoreError> {
        let prev = state.unwrap_or_default();
        self.warn_on_unexpected_keys(&prev);

        // Explicit did-any-key-change tracking; a key-count mismatch (new
        // slices to seed, or unexpected keys to drop) counts as a change.
        let mut changed = prev.len() != self.reducers.len();
        let mut next = BTreeMap::new();
        for (key, reducer) in &self.reducers {
            let prev_slice = prev.raw(key).cloned();
            let next_slice = reducer.reduce(prev_slice.clone(), action).ok_or_else(|| {
                StoreError::InvalidReducer {
                    key: key.clone(),
                    kind: action.kind().to_string(),
                }
            })?;
            changed = changed
                || match &prev_slice {
                    Some(prev_slice) => !Arc::ptr_eq(prev_slice, &next_slice),
                    None => true,
                };
            next.insert(key.clone(), next_slice);
        }

        Ok(if changed {
            StateMap::from_map(next)
        } else {
            prev
        })
    }
}
