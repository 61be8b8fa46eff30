//! Events consumed by the reducer.
//!
//! Everything that can change `ListState` arrives as a `UiEvent`: terminal
//! input, store notifications, timer expiries and fetch completion. Async
//! sources post into the runtime inbox; the runtime feeds them to `update`.

use crossterm::event::Event;
use tasklist_types::TaskId;

use crate::common::{TimerId, TimerKind};

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The list is shown for the first time.
    Mount,
    /// The list is torn down.
    Unmount,
    /// Animation tick.
    Tick,
    /// Raw terminal input.
    Terminal(Event),
    /// The store's fetch resolved (successfully or not).
    FetchSettled,
    /// The store's task count changed.
    TaskCountChanged { count: usize },
    /// A scheduled timer elapsed.
    TimerFired { kind: TimerKind, id: TimerId },
    /// A row asked to open or close its action menu.
    ToggleMenu(TaskId),
}
