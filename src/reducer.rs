//! Reducer trait: pure state transitions.

use crate::action::Action;
use crate::error::StoreError;

/// Computes the next state from the current state and an action.
///
/// The reducer is the only place where state transitions happen. It must be
/// pure: no side effects, no reads from the store (the engine rejects
/// re-entrant store calls while a reducer runs).
///
/// `state` is `None` only for an unseeded slot: the synthetic
/// init dispatch at construction (and for slices a replacement reducer
/// introduces later). A reducer must answer `None` with its default state.
///
/// Infallible closures of shape `Fn(Option<S>, &Action) -> S` implement
/// this trait directly; implement it by hand when a reducer can fail, as
/// the combinator in [`crate::combine`] does.
pub trait Reducer<S>: Send + Sync {
    /// Processes an action and returns the new state.
    fn reduce(&self, state: Option<S>, action: &Action) -> Result<S, StoreError>;
}

impl<S, F> Reducer<S> for F
where
    F: Fn(Option<S>, &Action) -> S + Send + Sync,
{
    fn reduce(&self, state: Option<S>, action: &Action) -> Result<S, StoreError> {
        Ok(self(state, action))
    }
}
