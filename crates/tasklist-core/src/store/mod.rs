//! Task store interface.
//!
//! The store owns the task collection and its error slot. Consumers read
//! snapshots, trigger a fetch, and observe changes of the collection length.

mod memory;

use futures_util::future::BoxFuture;
pub use memory::{MemoryTaskStore, TaskSource, demo_tasks};
use tasklist_types::{TaskId, TaskRef};

/// Callback invoked with the new task count whenever it changes.
pub type CountListener = Box<dyn Fn(usize) + Send + Sync>;

/// Externally owned, observable task collection.
pub trait TaskStore: Send + Sync {
    /// Snapshot of the tasks in store order.
    fn tasks(&self) -> Vec<TaskRef>;

    /// Number of tasks currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the last task in store order.
    fn last_task_id(&self) -> Option<TaskId>;

    /// Error left by the most recent fetch, if it failed.
    fn error(&self) -> Option<String>;

    /// Loads tasks. Resolves once the collection or the error is populated.
    fn fetch_tasks(&self) -> BoxFuture<'_, ()>;

    /// Registers `listener` for task-count changes.
    fn subscribe_count(&self, listener: CountListener) -> Subscription;
}

/// Disposer handle returned by [`TaskStore::subscribe_count`].
///
/// The disposer runs at most once, either through [`Subscription::dispose`]
/// or on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Self { disposer: None }
    }

    /// Unsubscribes. Later calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }

    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_dispose_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.dispose();
        sub.dispose();
        drop(sub);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_disposes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(sub.is_active());

        drop(sub);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
