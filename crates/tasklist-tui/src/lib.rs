//! Full-screen task list for tasklist.
//!
//! The list controller keeps presentation state only: loading flag, the one
//! open action menu, and the paddings that make room for the scrollbar and
//! for the last row's menu. Tasks stay in the store.

pub mod common;
pub mod effects;
pub mod events;
pub mod layout;
pub mod render;
pub mod row;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};
use std::sync::Arc;

use anyhow::Result;
pub use layout::{LayoutProbe, Viewport};
pub use row::{RowProps, RowRenderer, TaskRow, ToggleHandle};
pub use runtime::{ListController, TuiRuntime};
use tasklist_core::config::ListConfig;
use tasklist_core::store::TaskStore;

/// Runs the interactive task list until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub fn run_task_list(store: Arc<dyn TaskStore>, config: ListConfig) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!("tasklist requires a terminal on stdout.");
    }

    tracing::info!(?config, "starting task list");
    let mut runtime = TuiRuntime::new(store, config)?;
    runtime.run()
}
