//! Headless list controller.
//!
//! Owns `ListState`, the store handle, the optional layout probe and the
//! store subscription. Events go through the reducer; the returned effects
//! are executed here. The terminal runtime wraps this with input and drawing,
//! tests drive it directly under tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use tasklist_core::config::ListConfig;
use tasklist_core::store::{Subscription, TaskStore};
use tasklist_types::TaskId;
use tokio::sync::mpsc;

use super::handlers;
use super::inbox::{UiEventReceiver, UiEventSender};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::layout::{self, LayoutProbe};
use crate::row::ToggleHandle;
use crate::state::ListState;
use crate::update;

pub struct ListController<P: LayoutProbe> {
    pub state: ListState,
    store: Arc<dyn TaskStore>,
    probe: Option<P>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    subscription: Option<Subscription>,
}

impl<P: LayoutProbe> ListController<P> {
    pub fn new(store: Arc<dyn TaskStore>, config: ListConfig) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: ListState::new(config),
            store,
            probe: None,
            inbox_tx,
            inbox_rx,
            subscription: None,
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: P) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Attaches the container, returning the previous one.
    pub fn attach_probe(&mut self, probe: P) -> Option<P> {
        self.probe.replace(probe)
    }

    /// Detaches the container. Layout writes become no-ops.
    pub fn detach_probe(&mut self) -> Option<P> {
        self.probe.take()
    }

    pub fn probe(&self) -> Option<&P> {
        self.probe.as_ref()
    }

    pub fn probe_mut(&mut self) -> Option<&mut P> {
        self.probe.as_mut()
    }

    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    /// Callback handed to rows.
    pub fn toggle_handle(&self) -> ToggleHandle {
        ToggleHandle::new(self.inbox_tx.clone())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn mount(&mut self) {
        self.dispatch(UiEvent::Mount);
    }

    pub fn unmount(&mut self) {
        self.dispatch(UiEvent::Unmount);
    }

    pub fn toggle_menu(&mut self, id: TaskId) {
        self.dispatch(UiEvent::ToggleMenu(id));
    }

    /// Runs one event through the reducer and executes its effects.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, self.store.as_ref(), event);
        self.execute_effects(effects);
    }

    /// Dispatches everything currently queued in the inbox without waiting.
    /// Returns the number of events processed.
    pub fn drain_inbox(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            processed += 1;
        }
        processed
    }

    /// Dispatches inbox events as they arrive until `duration` has elapsed.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                event = self.inbox_rx.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                () = tokio::time::sleep_until(deadline) => break,
            }
        }
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Subscribe => {
                let subscription =
                    handlers::subscribe(self.store.as_ref(), self.inbox_tx.clone());
                if let Some(mut previous) = self.subscription.replace(subscription) {
                    previous.dispose();
                }
            }
            UiEffect::Unsubscribe => {
                if let Some(mut subscription) = self.subscription.take() {
                    subscription.dispose();
                }
            }
            UiEffect::FetchTasks => {
                handlers::spawn_fetch(Arc::clone(&self.store), self.inbox_tx.clone());
            }
            UiEffect::StartTimer {
                kind,
                id,
                delay,
                cancel,
            } => handlers::spawn_timer(kind, id, delay, cancel, self.inbox_tx.clone()),
            UiEffect::CancelTimer { kind, token } => {
                tracing::trace!(?kind, "cancelling timer");
                token.cancel();
            }
            UiEffect::RecomputePadding { padding } => {
                layout::recompute_padding(self.probe.as_mut(), padding);
            }
            UiEffect::ScrollToEnd => layout::scroll_to_end(self.probe.as_mut()),
            UiEffect::RevealRow { index } => layout::reveal_row(self.probe.as_mut(), index),
            UiEffect::ScrollBy { delta } => layout::scroll_by(self.probe.as_mut(), delta),
            UiEffect::ScrollPage { down } => layout::scroll_page(self.probe.as_mut(), down),
        }
    }
}

impl<P: LayoutProbe> Drop for ListController<P> {
    fn drop(&mut self) {
        if self.state.mounted {
            self.unmount();
        }
    }
}
