//! Error types for store operations.
//!
//! Every fault is local to the call that produced it and is returned as a
//! `Result`; nothing is retried or swallowed internally. The engine keeps
//! its dispatching flag consistent on all error paths, so a store that has
//! returned an error remains usable for subsequent calls.

use thiserror::Error;

/// Errors that can occur while constructing or operating a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A boundary misuse the type system cannot reject on its own,
    /// such as combining an empty reducer map.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The dispatched value is not a plain record with a usable
    /// discriminant.
    #[error("actions must be plain records with a \"type\" discriminant: {reason}")]
    InvalidAction { reason: String },

    /// Dispatch was invoked while a dispatch is already in progress,
    /// typically from inside a reducer.
    #[error("reducers may not dispatch actions")]
    ReentrantDispatch,

    /// A store operation that reads or mutates shared bookkeeping was
    /// invoked while the reducer is executing. The reducer already receives
    /// the state as an argument; read it from there instead.
    #[error("store.{operation}() may not be called while the reducer is executing")]
    InvalidStateAccess { operation: &'static str },

    /// A combined slice reducer produced no state for its key, either
    /// during combination-time probing or while handling a real action.
    #[error("reducer for key {key:?} returned no state when handling {kind:?}; \
             every slice reducer must return its default for unknown actions")]
    InvalidReducer { key: String, kind: String },

    /// A middleware dispatched through the store facade before the
    /// middleware chain finished composing. Other middleware would not see
    /// that dispatch.
    #[error("dispatching while constructing middleware is not allowed")]
    ConstructionOrderViolation,
}
