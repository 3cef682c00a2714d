//! Loading and error bookkeeping for concurrent operations.
//!
//! Every invocation gets its own id in dispatch order. Loading is true while
//! any invocation is pending. The error slot holds the outcome of the most
//! recently dispatched invocation that has settled, so a slow early call
//! cannot overwrite the result of a later one.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Dispatch-ordered invocation id
pub type OperationId = u64;

#[derive(Debug, Default)]
struct Settled {
    by: OperationId,
    error: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: AtomicU64,
    pending: DashMap<OperationId, &'static str>,
    settled: Mutex<Settled>,
}

/// Shared loading/error state for one store or gateway.
///
/// Cheap to clone; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    inner: Arc<Inner>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn settled(&self) -> MutexGuard<'_, Settled> {
        // The slot holds plain data, a poisoned lock is still consistent.
        self.inner
            .settled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Next id in dispatch order, without marking anything pending.
    pub fn stamp(&self) -> OperationId {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start an invocation: clears the error and marks loading.
    pub fn begin(&self, operation: &'static str) -> OperationGuard {
        let id = self.stamp();
        self.settled().error = None;
        self.inner.pending.insert(id, operation);
        tracing::debug!(operation, id, "operation started");
        OperationGuard {
            tracker: self.clone(),
            id,
            operation,
            finished: false,
        }
    }

    /// Record a failure detected before any call was made. Loading is
    /// never set.
    pub fn reject(&self, operation: &'static str, message: impl Into<String>) {
        let id = self.stamp();
        let message = message.into();
        tracing::debug!(operation, id, %message, "operation rejected");
        self.settle(id, Some(message));
    }

    fn settle(&self, id: OperationId, error: Option<String>) {
        let mut settled = self.settled();
        if id > settled.by {
            settled.by = id;
            settled.error = error;
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.inner.pending.is_empty()
    }

    pub fn error(&self) -> Option<String> {
        self.settled().error.clone()
    }

    /// Reset the error without touching loading.
    pub fn clear_error(&self) {
        self.settled().error = None;
    }

    /// Operations currently in flight, oldest first
    pub fn pending(&self) -> Vec<(OperationId, &'static str)> {
        let mut pending: Vec<_> = self
            .inner
            .pending
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        pending.sort_by_key(|(id, _)| *id);
        pending
    }
}

/// One in-flight invocation.
///
/// Settle it with [`succeed`](Self::succeed) or [`fail`](Self::fail).
/// Dropping it unsettled (e.g. the future was cancelled) clears its loading
/// mark and leaves the error slot alone.
#[derive(Debug)]
#[must_use = "an unsettled operation is treated as abandoned"]
pub struct OperationGuard {
    tracker: OperationTracker,
    id: OperationId,
    operation: &'static str,
    finished: bool,
}

impl OperationGuard {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn succeed(mut self) {
        tracing::debug!(operation = self.operation, id = self.id, "operation succeeded");
        self.finish(None);
    }

    pub fn fail(mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(operation = self.operation, id = self.id, %message, "operation failed");
        self.finish(Some(message));
    }

    fn finish(&mut self, error: Option<String>) {
        self.finished = true;
        self.tracker.settle(self.id, error);
        self.tracker.inner.pending.remove(&self.id);
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(operation = self.operation, id = self.id, "operation abandoned");
            self.tracker.inner.pending.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_until_every_call_settles() {
        let tracker = OperationTracker::new();
        let slow = tracker.begin("fetch_all");
        let fast = tracker.begin("search");
        assert!(tracker.is_loading());

        fast.succeed();
        assert!(tracker.is_loading());
        assert_eq!(tracker.pending(), vec![(slow.id(), "fetch_all")]);

        slow.succeed();
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_later_dispatch_wins() {
        let tracker = OperationTracker::new();
        let first = tracker.begin("search");
        let second = tracker.begin("search");

        second.succeed();
        first.fail("stale failure");
        assert_eq!(tracker.error(), None);

        let third = tracker.begin("search");
        let fourth = tracker.begin("search");
        fourth.fail("latest failure");
        third.succeed();
        assert_eq!(tracker.error().as_deref(), Some("latest failure"));
    }

    #[test]
    fn test_dropped_guard_clears_loading() {
        let tracker = OperationTracker::new();
        tracker.reject("create", "earlier");
        {
            let _guard = tracker.begin("create");
            assert!(tracker.is_loading());
        }
        assert!(!tracker.is_loading());
        assert_eq!(tracker.error(), None);
    }

    #[test]
    fn test_reject_never_loads() {
        let tracker = OperationTracker::new();
        tracker.reject("calculate", "You must be signed in");
        assert!(!tracker.is_loading());
        assert_eq!(tracker.error().as_deref(), Some("You must be signed in"));

        tracker.clear_error();
        assert_eq!(tracker.error(), None);
    }
}
