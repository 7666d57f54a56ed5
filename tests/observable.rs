mod common;

use std::sync::{Arc, Mutex};

use uniflow::{create_store, ObservableSource, StateObserver};

use common::{counter, increment};

/// Collects every pushed state value.
struct Collect {
    seen: Mutex<Vec<i64>>,
}

impl Collect {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<i64> {
        self.seen.lock().unwrap().clone()
    }
}

impl StateObserver<i64> for Collect {
    fn next(&self, state: &i64) {
        self.seen.lock().unwrap().push(*state);
    }
}

#[test]
fn subscription_pushes_current_state_immediately() {
    let store = create_store(counter, Some(3), None).unwrap();
    let observer = Collect::new();
    store.observable().subscribe(observer.clone()).unwrap();
    assert_eq!(observer.seen(), [3]);
}

#[test]
fn every_dispatch_pushes_the_new_state() {
    let store = create_store(counter, None, None).unwrap();
    let observer = Collect::new();
    store.observable().subscribe(observer.clone()).unwrap();

    store.dispatch(increment()).unwrap();
    store.dispatch(increment()).unwrap();

    assert_eq!(observer.seen(), [0, 1, 2]);
}

#[test]
fn unsubscribe_stops_emissions_and_is_idempotent() {
    let store = create_store(counter, None, None).unwrap();
    let observer = Collect::new();
    let subscription = store.observable().subscribe(observer.clone()).unwrap();

    store.dispatch(increment()).unwrap();
    subscription.unsubscribe().unwrap();
    subscription.unsubscribe().unwrap();
    store.dispatch(increment()).unwrap();

    assert_eq!(observer.seen(), [0, 1]);
}

/// Observer relying on the default no-op `next`.
struct Inert;

impl StateObserver<i64> for Inert {}

#[test]
fn observer_without_next_handler_is_fine() {
    let store = create_store(counter, None, None).unwrap();
    store.observable().subscribe(Arc::new(Inert)).unwrap();
    store.dispatch(increment()).unwrap();
    assert_eq!(store.get_state().unwrap(), 1);
}

#[test]
fn two_observers_receive_independent_streams() {
    let store = create_store(counter, None, None).unwrap();
    let first = Collect::new();
    let second = Collect::new();

    let observable = store.observable();
    let early = observable.subscribe(first.clone()).unwrap();
    store.dispatch(increment()).unwrap();
    observable.subscribe(second.clone()).unwrap();
    store.dispatch(increment()).unwrap();
    early.unsubscribe().unwrap();
    store.dispatch(increment()).unwrap();

    assert_eq!(first.seen(), [0, 1, 2]);
    assert_eq!(second.seen(), [1, 2, 3]);
}
