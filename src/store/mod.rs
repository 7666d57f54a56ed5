//! Store engine: the single owned state slot and its dispatch loop.
//!
//! The engine has two modes, idle and dispatching, tracked by one atomic
//! flag. Every public operation checks the flag first, so re-entrant calls
//! from inside a reducer fail fast instead of deadlocking on an internal
//! lock. No user code (reducer, listener, middleware) ever runs while an
//! internal lock is held.

mod listeners;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::action::{kinds, Action};
use crate::enhancer::Enhancer;
use crate::error::StoreError;
use crate::reducer::Reducer;

use listeners::SubscriberList;

/// Marker alias for state values the engine can hold.
///
/// States should be immutable snapshots: the engine never mutates one in
/// place, it installs the value the reducer returns. Clone is expected to
/// be cheap (states built from `Arc`-backed slices, as
/// [`crate::combine::StateMap`] is, clone in O(1)).
pub trait StoreState: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> StoreState for T {}

/// The effective dispatch function of a store handle.
///
/// For a bare store this is the engine's raw dispatch; middleware wraps it.
pub type DispatchFn = Arc<dyn Fn(Action) -> Result<Action, StoreError> + Send + Sync>;

pub(crate) struct StoreInner<S> {
    state: Mutex<Option<S>>,
    reducer: RwLock<Arc<dyn Reducer<S>>>,
    listeners: Mutex<SubscriberList>,
    dispatching: AtomicBool,
    next_listener_id: AtomicU64,
}

impl<S: StoreState> StoreInner<S> {
    pub(crate) fn current_state(&self) -> Result<S, StoreError> {
        if self.dispatching.load(Ordering::SeqCst) {
            return Err(StoreError::InvalidStateAccess {
                operation: "get_state",
            });
        }
        let slot = self.state.lock();
        Ok(slot
            .clone()
            .expect("state is seeded by the init dispatch at construction"))
    }

    fn dispatch(self: &Arc<Self>, action: Action) -> Result<Action, StoreError> {
        if action.kind().is_empty() {
            return Err(StoreError::InvalidAction {
                reason: "empty \"type\" discriminant".to_string(),
            });
        }
        if self.dispatching.swap(true, Ordering::SeqCst) {
            return Err(StoreError::ReentrantDispatch);
        }
        {
            // Scoped release: the flag must return to idle on every exit
            // path, including a failing reducer, or the store is wedged.
            let _idle = scopeguard::guard(&self.dispatching, |flag| {
                flag.store(false, Ordering::SeqCst);
            });
            let reducer = Arc::clone(&self.reducer.read());
            let mut slot = self.state.lock();
            let next = reducer.reduce(slot.clone(), &action)?;
            *slot = Some(next);
        }
        tracing::trace!(kind = action.kind(), "dispatched action");

        // Notification runs in idle mode from an immutable snapshot, so
        // listeners may dispatch, subscribe, and unsubscribe; mutations
        // only affect the next dispatch's snapshot.
        let snapshot = self.listeners.lock().commit();
        for entry in snapshot.iter() {
            (entry.callback)();
        }
        Ok(action)
    }

    fn subscribe(
        self: &Arc<Self>,
        callback: Arc<dyn Fn() + Send + Sync>,
    ) -> Result<Subscription, StoreError> {
        if self.dispatching.load(Ordering::SeqCst) {
            return Err(StoreError::InvalidStateAccess {
                operation: "subscribe",
            });
        }
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().subscribe(id, callback);

        let inner = Arc::clone(self);
        Ok(Subscription::new(move || {
            if inner.dispatching.load(Ordering::SeqCst) {
                return Err(StoreError::InvalidStateAccess {
                    operation: "unsubscribe",
                });
            }
            inner.listeners.lock().unsubscribe(id);
            Ok(())
        }))
    }
}

/// Handle for removing a registered listener.
///
/// Unsubscribing twice is a no-op. Unsubscribing while a reducer is
/// executing fails with [`StoreError::InvalidStateAccess`]; unsubscribing
/// from inside a listener during notification is allowed and takes effect
/// on the next dispatch.
pub struct Subscription {
    remove: Box<dyn Fn() -> Result<(), StoreError> + Send + Sync>,
    active: AtomicBool,
}

impl Subscription {
    fn new(remove: impl Fn() -> Result<(), StoreError> + Send + Sync + 'static) -> Self {
        Self {
            remove: Box::new(remove),
            active: AtomicBool::new(true),
        }
    }

    /// Removes the listener. Idempotent.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.active.load(Ordering::SeqCst) {
            return Ok(());
        }
        (self.remove)()?;
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// A reducer-driven state container.
///
/// The handle is cheap to clone; clones share the same engine. The only way
/// to change the state is [`Store::dispatch`]. Hold and pass the handle
/// explicitly; there is no ambient global store.
pub struct Store<S> {
    inner: Arc<StoreInner<S>>,
    dispatcher: DispatchFn,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<S: StoreState> Store<S> {
    /// Constructs the bare engine and seeds state with the synthetic init
    /// dispatch. Enhancers receive this as the innermost store creator.
    pub(crate) fn bare(reducer: Arc<dyn Reducer<S>>, preloaded: Option<S>) -> Result<Self, StoreError> {
        let inner = Arc::new(StoreInner {
            state: Mutex::new(preloaded),
            reducer: RwLock::new(reducer),
            listeners: Mutex::new(SubscriberList::new()),
            dispatching: AtomicBool::new(false),
            next_listener_id: AtomicU64::new(0),
        });
        inner.dispatch(kinds::init())?;
        let dispatcher = raw_dispatch(&inner);
        Ok(Self { inner, dispatcher })
    }

    /// Reads the current state.
    ///
    /// Fails with [`StoreError::InvalidStateAccess`] while a reducer is
    /// executing: the reducer already received the state as an argument.
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.inner.current_state()
    }

    /// Dispatches an action through the store's effective dispatch chain
    /// and returns the same action on success.
    ///
    /// Fails with [`StoreError::InvalidAction`] for an empty discriminant
    /// and [`StoreError::ReentrantDispatch`] when a dispatch is already in
    /// progress.
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        (self.dispatcher)(action)
    }

    /// Registers a change listener, called with no arguments after every
    /// dispatch. Read the new state with [`Store::get_state`] inside the
    /// callback.
    ///
    /// The subscriber list is snapshotted when each dispatch commits:
    /// subscribing during notification defers the new listener to the next
    /// dispatch, and a listener that unsubscribes itself mid-notification
    /// is still called for the round already in flight.
    pub fn subscribe(
        &self,
        listener: impl Fn() + Send + Sync + 'static,
    ) -> Result<Subscription, StoreError> {
        self.inner.subscribe(Arc::new(listener))
    }

    /// Swaps the current reducer and dispatches a synthetic replace action
    /// so sub-reducers introduced by the new reducer seed their defaults.
    ///
    /// The synthetic dispatch goes through the raw engine dispatch, not the
    /// middleware chain.
    pub fn replace_reducer(&self, next: impl Reducer<S> + 'static) -> Result<(), StoreError> {
        *self.inner.reducer.write() = Arc::new(next);
        tracing::debug!("reducer replaced");
        self.inner.dispatch(kinds::replace())?;
        Ok(())
    }

    pub(crate) fn inner(&self) -> &Arc<StoreInner<S>> {
        &self.inner
    }

    /// The engine's raw dispatch, used as the innermost `next` when a
    /// middleware chain is composed.
    pub(crate) fn raw_dispatch_fn(&self) -> DispatchFn {
        raw_dispatch(&self.inner)
    }

    /// Returns a handle sharing this engine but dispatching through `f`.
    pub(crate) fn with_dispatch(&self, f: DispatchFn) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dispatcher: f,
        }
    }
}

fn raw_dispatch<S: StoreState>(inner: &Arc<StoreInner<S>>) -> DispatchFn {
    let inner = Arc::clone(inner);
    Arc::new(move |action| inner.dispatch(action))
}

/// Creates a store from a reducer, optional preloaded state, and optional
/// enhancer.
///
/// With an enhancer present, construction is delegated entirely to
/// `enhancer.enhance(bare_creator)`: the enhancer decides the composition
/// and the bare engine is only built where the enhanced creator chooses to.
/// Without one, the bare engine is built directly. Either way the synthetic
/// init dispatch has run before the handle is returned, so every reducer
/// has reported its default state.
pub fn create_store<S: StoreState>(
    reducer: impl Reducer<S> + 'static,
    preloaded: Option<S>,
    enhancer: Option<&dyn Enhancer<S>>,
) -> Result<Store<S>, StoreError> {
    let reducer: Arc<dyn Reducer<S>> = Arc::new(reducer);
    match enhancer {
        Some(enhancer) => enhancer.enhance(Box::new(Store::bare))(reducer, preloaded),
        None => Store::bare(reducer, preloaded),
    }
}
