//! Dual-buffer subscriber list.
//!
//! The engine notifies listeners from an immutable committed snapshot while
//! subscriptions and unsubscriptions land in a pending copy. The pending
//! copy is materialized lazily: the first mutation after a commit clones the
//! committed list once, and every further mutation before the next commit
//! reuses it. Copy cost is therefore capped at one clone per dispatch cycle
//! regardless of subscription churn.

use std::mem;
use std::sync::Arc;

/// A registered change listener. Identity is the id, never the closure:
/// the same closure subscribed twice occupies two independent slots.
#[derive(Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) id: u64,
    pub(crate) callback: Arc<dyn Fn() + Send + Sync>,
}

pub(crate) struct SubscriberList {
    /// Snapshot used by the most recent dispatch's notification phase.
    committed: Arc<Vec<ListenerEntry>>,
    /// Working copy receiving mutations; meaningful only while `dirty`.
    pending: Vec<ListenerEntry>,
    /// True once `pending` has diverged from `committed`.
    dirty: bool,
}

impl SubscriberList {
    pub(crate) fn new() -> Self {
        Self {
            committed: Arc::new(Vec::new()),
            pending: Vec::new(),
            dirty: false,
        }
    }

    fn pending_mut(&mut self) -> &mut Vec<ListenerEntry> {
        if !self.dirty {
            self.pending = self.committed.as_ref().clone();
            self.dirty = true;
        }
        &mut self.pending
    }

    pub(crate) fn subscribe(&mut self, id: u64, callback: Arc<dyn Fn() + Send + Sync>) {
        self.pending_mut().push(ListenerEntry { id, callback });
    }

    /// Removes a listener by id. Removing an id that is not present is a
    /// no-op, which is what makes unsubscribe handles idempotent.
    pub(crate) fn unsubscribe(&mut self, id: u64) {
        if self.dirty || self.committed.iter().any(|entry| entry.id == id) {
            self.pending_mut().retain(|entry| entry.id != id);
        }
    }

    /// Promotes pending mutations into a fresh committed snapshot and
    /// returns it. Called once per dispatch, after the reducer has run.
    pub(crate) fn commit(&mut self) -> Arc<Vec<ListenerEntry>> {
        if self.dirty {
            self.committed = Arc::new(mem::take(&mut self.pending));
            self.dirty = false;
        }
        Arc::clone(&self.committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> Arc<dyn Fn() + Send + Sync> {
        Arc::new(|| {})
    }

    #[test]
    fn commit_preserves_registration_order() {
        let mut list = SubscriberList::new();
        list.subscribe(1, noop());
        list.subscribe(2, noop());
        list.subscribe(3, noop());
        let snapshot = list.commit();
        let ids: Vec<u64> = snapshot.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn mutation_after_commit_leaves_snapshot_intact() {
        let mut list = SubscriberList::new();
        list.subscribe(1, noop());
        let snapshot = list.commit();
        list.subscribe(2, noop());
        list.unsubscribe(1);
        assert_eq!(snapshot.len(), 1);
        let next = list.commit();
        let ids: Vec<u64> = next.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn unsubscribe_of_unknown_id_is_noop() {
        let mut list = SubscriberList::new();
        list.subscribe(1, noop());
        list.unsubscribe(99);
        assert_eq!(list.commit().len(), 1);
    }

    #[test]
    fn one_clone_per_cycle_regardless_of_churn() {
        // Subscribing many times between commits must not re-copy the
        // committed list each time; the shared counter closure would
        // otherwise be cloned repeatedly. We can only observe behavior,
        // so assert the committed snapshot is reused when clean.
        let mut list = SubscriberList::new();
        list.subscribe(1, noop());
        let first = list.commit();
        let second = list.commit();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn same_closure_twice_occupies_two_slots() {
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        let callback: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
            count2.fetch_add(1, Ordering::SeqCst);
        });
        let mut list = SubscriberList::new();
        list.subscribe(1, Arc::clone(&callback));
        list.subscribe(2, callback);
        for entry in list.commit().iter() {
            (entry.callback)();
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
