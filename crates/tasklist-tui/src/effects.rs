//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes:
//! spawning the fetch, starting and cancelling timers, managing the store
//! subscription and writing to the layout probe. The reducer itself never
//! performs I/O, spawns tasks or touches the container.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::common::{TimerId, TimerKind};

#[derive(Debug)]
pub enum UiEffect {
    /// Register for task-count notifications.
    Subscribe,

    /// Dispose the store subscription.
    Unsubscribe,

    /// Run the store's fetch; completion posts `UiEvent::FetchSettled`.
    FetchTasks,

    /// Post `UiEvent::TimerFired` after `delay` unless `cancel` fires first.
    StartTimer {
        kind: TimerKind,
        id: TimerId,
        delay: Duration,
        cancel: CancellationToken,
    },

    /// Cancel a pending timer.
    CancelTimer {
        kind: TimerKind,
        token: CancellationToken,
    },

    // ========================================================================
    // Layout writes
    // ========================================================================
    /// Set the right padding from the container's overflow.
    RecomputePadding { padding: u16 },

    /// Scroll the container to its maximum offset.
    ScrollToEnd,

    /// Scroll so row `index` is fully visible.
    RevealRow { index: usize },

    /// Scroll by `delta` rows.
    ScrollBy { delta: i32 },

    /// Scroll one page.
    ScrollPage { down: bool },
}
