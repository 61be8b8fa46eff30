//! Effect handlers that spawn work.
//!
//! Handlers never touch state. Results come back as `UiEvent`s on the inbox.

use std::sync::Arc;
use std::time::Duration;

use tasklist_core::store::{Subscription, TaskStore};
use tokio_util::sync::CancellationToken;

use super::inbox::UiEventSender;
use crate::common::{TimerId, TimerKind};
use crate::events::UiEvent;

/// Runs the store's fetch and posts `FetchSettled` when it resolves.
pub fn spawn_fetch(store: Arc<dyn TaskStore>, tx: UiEventSender) {
    tokio::spawn(async move {
        store.fetch_tasks().await;
        let _ = tx.send(UiEvent::FetchSettled);
    });
}

/// Posts `TimerFired` after `delay` unless `cancel` fires first.
pub fn spawn_timer(
    kind: TimerKind,
    id: TimerId,
    delay: Duration,
    cancel: CancellationToken,
    tx: UiEventSender,
) {
    tokio::spawn(async move {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::trace!(?kind, ?id, "timer cancelled");
            }
            () = tokio::time::sleep(delay) => {
                let _ = tx.send(UiEvent::TimerFired { kind, id });
            }
        }
    });
}

/// Forwards task-count changes into the inbox.
pub fn subscribe(store: &dyn TaskStore, tx: UiEventSender) -> Subscription {
    store.subscribe_count(Box::new(move |count| {
        let _ = tx.send(UiEvent::TaskCountChanged { count });
    }))
}
