//! Middleware: interceptors on the dispatch path.
//!
//! A middleware sits between the caller and the engine's raw dispatch. It
//! can observe, transform, delay, or swallow actions, and may introduce
//! asynchrony by deferring its call to `next`; the engine itself stays
//! synchronous.

mod compose;

pub use compose::compose;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::action::Action;
use crate::enhancer::{Enhancer, StoreCreator};
use crate::error::StoreError;
use crate::store::{DispatchFn, StoreInner, StoreState};

/// The store surface handed to middleware.
///
/// `get_state` forwards to the engine. `dispatch` forwards through a
/// late-bound slot that is only filled once the whole chain is composed,
/// so a middleware may capture the facade during construction and dispatch
/// later. The dispatch then runs the **full** chain, not just the layers
/// below the captured one.
pub struct StoreFacade<S> {
    inner: Arc<StoreInner<S>>,
    dispatch_slot: Arc<RwLock<Option<DispatchFn>>>,
}

impl<S> Clone for StoreFacade<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dispatch_slot: Arc::clone(&self.dispatch_slot),
        }
    }
}

impl<S: StoreState> StoreFacade<S> {
    /// Reads the current state from the underlying engine.
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.inner.current_state()
    }

    /// Dispatches through the composed chain.
    ///
    /// Fails with [`StoreError::ConstructionOrderViolation`] if called
    /// before composition completes, i.e. synchronously from inside a
    /// middleware's `intercept`.
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        let dispatch = match self.dispatch_slot.read().as_ref() {
            Some(dispatch) => Arc::clone(dispatch),
            None => return Err(StoreError::ConstructionOrderViolation),
        };
        dispatch(action)
    }
}

/// An interceptor on the dispatch path.
///
/// `intercept` is called exactly once while the chain is wired, with the
/// store facade and the next dispatcher in line (the engine's raw dispatch
/// for the innermost middleware). It returns the dispatcher exposed to the
/// layer above.
pub trait Middleware<S>: Send + Sync {
    fn intercept(&self, store: &StoreFacade<S>, next: DispatchFn) -> DispatchFn;
}

/// Enhancer produced by [`apply_middleware`].
pub struct MiddlewareEnhancer<S> {
    middlewares: Vec<Arc<dyn Middleware<S>>>,
}

/// Creates a store enhancer that threads the given middleware, first to
/// outermost, around the engine's raw dispatch.
///
/// Because middleware may defer work, this should be the first enhancer in
/// any composition chain.
pub fn apply_middleware<S: StoreState>(
    middlewares: Vec<Arc<dyn Middleware<S>>>,
) -> MiddlewareEnhancer<S> {
    MiddlewareEnhancer { middlewares }
}

impl<S: StoreState> Enhancer<S> for MiddlewareEnhancer<S> {
    fn enhance(&self, next: StoreCreator<S>) -> StoreCreator<S> {
        let middlewares = self.middlewares.clone();
        Box::new(move |reducer, preloaded| {
            // The bare store must exist first so get_state and the raw
            // dispatch are available to the chain.
            let store = next(reducer, preloaded)?;

            let dispatch_slot: Arc<RwLock<Option<DispatchFn>>> = Arc::new(RwLock::new(None));
            let facade = StoreFacade {
                inner: Arc::clone(store.inner()),
                dispatch_slot: Arc::clone(&dispatch_slot),
            };

            let transforms: Vec<Box<dyn FnOnce(DispatchFn) -> DispatchFn>> = middlewares
                .iter()
                .map(|middleware| {
                    let middleware = Arc::clone(middleware);
                    let facade = facade.clone();
                    Box::new(move |inner: DispatchFn| middleware.intercept(&facade, inner))
                        as Box<dyn FnOnce(DispatchFn) -> DispatchFn>
                })
                .collect();

            let dispatch = compose(transforms)(store.raw_dispatch_fn());
            *dispatch_slot.write() = Some(Arc::clone(&dispatch));
            Ok(store.with_dispatch(dispatch))
        })
    }
}
