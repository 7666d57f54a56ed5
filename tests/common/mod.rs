//! Shared reducers and actions for integration tests.

#![allow(dead_code)]

use uniflow::Action;

/// Counter reducer: the smallest useful slice of domain logic.
pub fn counter(state: Option<i64>, action: &Action) -> i64 {
    let current = state.unwrap_or(0);
    match action.kind() {
        "INCREMENT" => current + 1,
        "DECREMENT" => current - 1,
        _ => current,
    }
}

pub fn increment() -> Action {
    Action::new("INCREMENT")
}

pub fn decrement() -> Action {
    Action::new("DECREMENT")
}
