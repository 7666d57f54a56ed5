//! Observable adapter: the store's change stream as a push-based
//! subscription interface for external reactive consumers.

use std::sync::Arc;

use crate::error::StoreError;
use crate::store::{Store, StoreState, Subscription};

/// A push-based consumer of state values.
///
/// `next` has a default no-op body, mirroring observers that choose not to
/// handle value notifications.
pub trait StateObserver<S>: Send + Sync {
    fn next(&self, _state: &S) {}
}

/// A minimal observable of state changes backed by a store.
pub struct StateObservable<S> {
    store: Store<S>,
}

impl<S: StoreState> StateObservable<S> {
    /// Subscribes an observer.
    ///
    /// The current state is pushed immediately, then again after every
    /// future dispatch until the returned handle unsubscribes.
    pub fn subscribe(
        &self,
        observer: Arc<dyn StateObserver<S>>,
    ) -> Result<ObservableSubscription, StoreError> {
        observer.next(&self.store.get_state()?);

        let store = self.store.clone();
        let subscription = self.store.subscribe(move || {
            // Notification runs in idle mode, so the read cannot fail.
            if let Ok(state) = store.get_state() {
                observer.next(&state);
            }
        })?;
        Ok(ObservableSubscription { subscription })
    }
}

/// Handle for ending an observable subscription.
pub struct ObservableSubscription {
    subscription: Subscription,
}

impl ObservableSubscription {
    /// Stops further state emissions. Idempotent.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        self.subscription.unsubscribe()
    }
}

/// Capability marker identifying a value as a source of observable state,
/// for interoperability with reactive-stream consumers.
pub trait ObservableSource<S: StoreState> {
    fn observable(&self) -> StateObservable<S>;
}

impl<S: StoreState> ObservableSource<S> for Store<S> {
    fn observable(&self) -> StateObservable<S> {
        StateObservable {
            store: self.clone(),
        }
    }
}
