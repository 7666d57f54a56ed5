//! Store enhancers: wrappers around the store creator.

use std::sync::Arc;

use crate::error::StoreError;
use crate::reducer::Reducer;
use crate::store::{Store, StoreState};

/// Builds a store from a reducer and optional preloaded state.
///
/// The innermost creator constructs the bare engine; enhancers wrap it.
pub type StoreCreator<S> =
    Box<dyn FnOnce(Arc<dyn Reducer<S>>, Option<S>) -> Result<Store<S>, StoreError>>;

/// A cross-cutting capability layered over store construction, such as
/// middleware injection.
///
/// An enhancer receives the next creator in the chain and returns a new
/// creator with augmented behavior. When [`crate::create_store`] is given
/// an enhancer, the entire construction is delegated to the creator the
/// enhancer returns.
pub trait Enhancer<S: StoreState> {
    fn enhance(&self, next: StoreCreator<S>) -> StoreCreator<S>;
}
