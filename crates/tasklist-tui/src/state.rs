//! List state.
//!
//! `ListState` is everything the list controller owns. The task collection
//! itself belongs to the store and is never copied in here; the reducer reads
//! it through `&dyn TaskStore` when it needs the current order.
//!
//! ```text
//! ListState
//! ├── is_loading            (fetch in flight or loading floor pending)
//! ├── open_task_id          (at most one open action menu)
//! ├── extra_bottom_padding  (non-zero only while the last row's menu is open)
//! ├── timer_seq / timers    (single-flight padding, scroll, loading-floor timers)
//! └── selected, spinner_frame, mounted, should_quit
//! ```

use tasklist_core::config::ListConfig;
use tasklist_types::TaskId;

use crate::common::{TimerSeq, Timers};

#[derive(Debug, Default)]
pub struct ListState {
    /// Fixed paddings and timing windows.
    pub config: ListConfig,
    /// Set between `Mount` and `Unmount`.
    pub mounted: bool,
    /// Loading indicator shown instead of the rows.
    pub is_loading: bool,
    /// Task whose action menu is open.
    pub open_task_id: Option<TaskId>,
    /// Bottom inset applied to the container.
    pub extra_bottom_padding: u16,
    /// Keyboard cursor (index into the store order).
    pub selected: usize,
    /// Loading spinner frame counter.
    pub spinner_frame: usize,
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Timer id sequence.
    pub timer_seq: TimerSeq,
    /// Pending timers per purpose.
    pub timers: Timers,
}

impl ListState {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_open(&self, id: &TaskId) -> bool {
        self.open_task_id.as_ref() == Some(id)
    }
}
