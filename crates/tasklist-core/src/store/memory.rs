//! In-memory task store.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use futures_util::future::BoxFuture;
use tasklist_types::{TaskId, TaskRef};

use super::{CountListener, Subscription, TaskStore};

/// Where a fetch gets its tasks from.
#[derive(Debug, Clone)]
pub enum TaskSource {
    /// A fixed list.
    Inline(Vec<TaskRef>),
    /// A JSON file containing an array of tasks.
    File(PathBuf),
    /// Every fetch fails with this message.
    Failing(String),
}

impl TaskSource {
    fn load(&self) -> Result<Vec<TaskRef>> {
        match self {
            TaskSource::Inline(tasks) => Ok(tasks.clone()),
            TaskSource::File(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read tasks from {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse tasks from {}", path.display()))
            }
            TaskSource::Failing(message) => Err(anyhow!("{message}")),
        }
    }
}

#[derive(Debug, Default)]
struct Contents {
    tasks: Vec<TaskRef>,
    error: Option<String>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, CountListener)>,
}

impl Listeners {
    fn notify(&self, count: usize) {
        for (_, listener) in &self.entries {
            listener(count);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Task store holding its collection in memory.
///
/// Listeners registered through [`TaskStore::subscribe_count`] are called
/// synchronously, on the mutating thread, only when the length changes.
pub struct MemoryTaskStore {
    source: TaskSource,
    latency: Duration,
    contents: Mutex<Contents>,
    listeners: Arc<Mutex<Listeners>>,
}

impl MemoryTaskStore {
    pub fn new(source: TaskSource) -> Self {
        Self {
            source,
            latency: Duration::ZERO,
            contents: Mutex::new(Contents::default()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Delays every fetch by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the collection, notifying listeners if the length changed.
    pub fn set_tasks(&self, tasks: Vec<TaskRef>) {
        let (before, after) = {
            let mut contents = lock(&self.contents);
            let before = contents.tasks.len();
            contents.tasks = tasks;
            (before, contents.tasks.len())
        };
        self.notify_if_changed(before, after);
    }

    /// Appends a task.
    pub fn push(&self, task: TaskRef) {
        let (before, after) = {
            let mut contents = lock(&self.contents);
            contents.tasks.push(task);
            (contents.tasks.len() - 1, contents.tasks.len())
        };
        self.notify_if_changed(before, after);
    }

    /// Removes the task with `id`. Returns whether one was removed.
    pub fn remove(&self, id: &TaskId) -> bool {
        let (before, after) = {
            let mut contents = lock(&self.contents);
            let before = contents.tasks.len();
            contents.tasks.retain(|task| &task.id != id);
            (before, contents.tasks.len())
        };
        self.notify_if_changed(before, after);
        before != after
    }

    pub fn set_error(&self, error: Option<String>) {
        lock(&self.contents).error = error;
    }

    fn notify_if_changed(&self, before: usize, after: usize) {
        if before != after {
            tracing::debug!(before, after, "task count changed");
            lock(&self.listeners).notify(after);
        }
    }
}

impl TaskStore for MemoryTaskStore {
    fn tasks(&self) -> Vec<TaskRef> {
        lock(&self.contents).tasks.clone()
    }

    fn len(&self) -> usize {
        lock(&self.contents).tasks.len()
    }

    fn last_task_id(&self) -> Option<TaskId> {
        lock(&self.contents).tasks.last().map(|task| task.id.clone())
    }

    fn error(&self) -> Option<String> {
        lock(&self.contents).error.clone()
    }

    fn fetch_tasks(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            match self.source.load() {
                Ok(tasks) => {
                    tracing::info!(count = tasks.len(), "tasks fetched");
                    self.set_error(None);
                    self.set_tasks(tasks);
                }
                Err(err) => {
                    let message = format!("{err:#}");
                    tracing::warn!(error = %message, "task fetch failed");
                    self.set_error(Some(message));
                }
            }
        })
    }

    fn subscribe_count(&self, listener: CountListener) -> Subscription {
        let id = {
            let mut listeners = lock(&self.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            id
        };

        let registry: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                lock(&registry).entries.retain(|(entry, _)| *entry != id);
            }
        })
    }
}

/// Sample tasks used when no task file is configured.
pub fn demo_tasks() -> Vec<TaskRef> {
    [
        "Review pull requests",
        "Water the plants",
        "Book dentist appointment",
        "Renew passport",
        "Plan weekend hike",
        "Write release notes",
        "Back up laptop",
        "Call the landlord",
        "Order printer ink",
        "Update CV",
        "Clean the fridge",
        "Pay electricity bill",
        "Read chapter 4",
        "Fix bike brakes",
    ]
    .iter()
    .enumerate()
    .map(|(idx, title)| TaskRef::new(format!("demo-{}", idx + 1), *title))
    .collect()
}
