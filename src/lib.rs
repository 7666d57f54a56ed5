//! Single-store, reducer-driven state container.
//!
//! A process holds one [`Store`]: a mutable state value that can only
//! change through a serializable description of what happened (an
//! [`Action`]), funneled through a pure transition function (a
//! [`Reducer`]), with middleware interception on the dispatch path and
//! subscriber notification after every transition.
//!
//! # Architecture
//!
//! ```text
//! dispatch(action) ──→ middleware chain ──→ raw dispatch ──→ reducer
//!        ↑                                                      │
//!   caller / listeners ←── notification ←── state swap ←────────┘
//! ```
//!
//! - **State**: owned by the store, replaced (never mutated) per dispatch
//! - **Action**: plain record with a `"type"` discriminant
//! - **Reducer**: pure `(state, action) -> state`
//! - **Middleware**: interceptors able to observe, transform, or delay
//!   actions; the store itself stays synchronous
//!
//! Dispatch is strictly synchronous and re-entrancy is rejected: calling
//! `dispatch`, `get_state`, or `subscribe` from inside a reducer fails
//! with a [`StoreError`] instead of corrupting the state slot.

mod action;
mod combine;
mod enhancer;
mod error;
mod middleware;
mod observable;
mod reducer;
mod store;

pub use action::Action;
pub use combine::{combine_reducers, slice, CombinedReducer, DynSlice, SliceReducer, StateMap};
pub use enhancer::{Enhancer, StoreCreator};
pub use error::StoreError;
pub use middleware::{apply_middleware, compose, Middleware, MiddlewareEnhancer, StoreFacade};
pub use observable::{ObservableSource, ObservableSubscription, StateObservable, StateObserver};
pub use reducer::Reducer;
pub use store::{create_store, DispatchFn, Store, StoreState, Subscription};
