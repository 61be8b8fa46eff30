//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; the controller executes them.
//!
//! ## Inbox Pattern
//!
//! Fetch completion, store notifications, timer expiries and row toggles are
//! all sent to `inbox_tx`. The runtime drains the inbox every frame, so state
//! is only ever mutated from the loop.
//!
//! Structure:
//! - `mod.rs`: terminal runtime (`TuiRuntime`, event loop, drawing)
//! - `controller.rs`: headless controller (dispatch, effect execution)
//! - `inbox.rs`: inbox channel types
//! - `handlers.rs`: spawning effect handlers (fetch, timers, subscription)

mod controller;
mod handlers;
mod inbox;

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
pub use controller::ListController;
use crossterm::event::{self, Event, MouseButton, MouseEventKind};
pub use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tasklist_core::config::ListConfig;
use tasklist_core::store::TaskStore;

use crate::events::UiEvent;
use crate::layout::Viewport;
use crate::render::{self, RenderContext};
use crate::row::{RowProps, RowRenderer, TaskRow, ToggleHandle};
use crate::terminal;

/// Interval between animation ticks (and redraws when idle).
pub const TICK_DURATION: Duration = Duration::from_millis(100);

/// Upper bound on how long terminal polling blocks, so inbox events
/// (timer expiries in particular) are picked up promptly.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Full-screen TUI runtime.
///
/// Owns the terminal and the controller. Terminal state is restored on drop
/// and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: ListController<Viewport>,
    renderer: Box<dyn RowRenderer>,
    on_toggle: ToggleHandle,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a runtime drawing rows with the default [`TaskRow`].
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(store: Arc<dyn TaskStore>, config: ListConfig) -> Result<Self> {
        Self::with_renderer(store, config, Box::new(TaskRow))
    }

    /// Creates a runtime with a custom row renderer.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn with_renderer(
        store: Arc<dyn TaskStore>,
        config: ListConfig,
        renderer: Box<dyn RowRenderer>,
    ) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let controller = ListController::new(store, config).with_probe(Viewport::default());
        let on_toggle = controller.toggle_handle();

        Ok(Self {
            terminal,
            controller,
            renderer,
            on_toggle,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// Must be called from within a multi-threaded tokio runtime: the loop
    /// blocks on terminal polling while fetch and timers run on workers.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        self.controller.mount();
        let result = self.event_loop();
        self.controller.unmount();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.controller.state.should_quit {
            self.controller.drain_inbox();
            self.draw()?;

            let until_tick = TICK_DURATION.saturating_sub(self.last_tick.elapsed());
            if event::poll(until_tick.min(FRAME_DURATION))
                .context("Failed to poll terminal events")?
            {
                let event = event::read().context("Failed to read terminal event")?;
                self.handle_terminal_event(event);
            }

            if self.last_tick.elapsed() >= TICK_DURATION {
                self.last_tick = Instant::now();
                self.controller.dispatch(UiEvent::Tick);
            }
        }
        Ok(())
    }

    /// Left clicks go to the row under the cursor; everything else to the reducer.
    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Mouse(mouse) = &event
            && mouse.kind == MouseEventKind::Down(MouseButton::Left)
        {
            self.click(mouse.column, mouse.row);
            return;
        }
        self.controller.dispatch(UiEvent::Terminal(event));
    }

    fn click(&self, column: u16, row: u16) {
        if self.controller.state.is_loading {
            return;
        }
        let Some(hit) = self
            .controller
            .probe()
            .and_then(|viewport| viewport.row_at(column, row))
        else {
            return;
        };
        let tasks = self.controller.store().tasks();
        let Some(task) = tasks.iter().find(|task| task.id == hit.id) else {
            return;
        };
        let props = RowProps {
            task,
            is_open: self.controller.state.is_open(&task.id),
            is_selected: hit.index == self.controller.state.selected,
            on_toggle: &self.on_toggle,
        };
        self.renderer
            .on_click(&props, column.saturating_sub(hit.area.x));
    }

    fn draw(&mut self) -> Result<()> {
        let fallback = Viewport::default();
        let controller = &self.controller;
        let viewport = controller.probe().unwrap_or(&fallback);
        let ctx = RenderContext {
            state: &controller.state,
            store: controller.store(),
            renderer: self.renderer.as_ref(),
            viewport,
            on_toggle: &self.on_toggle,
        };
        self.terminal
            .draw(|frame| render::render(&ctx, frame))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
