//! Pure view/render functions for the task list.
//!
//! Functions here take the state and store by shared reference and draw to
//! a ratatui `Frame`. The only writes go to the `Viewport`'s measurement
//! cells, which the controller reads back through `LayoutProbe`.

use std::ops::Range;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use tasklist_core::store::TaskStore;
use tasklist_types::TaskRef;

use crate::common::Scrollbar;
use crate::layout::{RowHit, Viewport};
use crate::row::{MENU_WIDTH, RowProps, RowRenderer, ToggleHandle};
use crate::state::ListState;

/// Spinner frames for the loading indicator.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const FOOTER_HEIGHT: u16 = 1;

/// What the list shows, decided from state and the store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Fetch in flight (or loading floor pending).
    Loading,
    /// Fetch failed; the message is shown verbatim.
    Error(String),
    /// One row per task in store order.
    Rows(Vec<TaskRef>),
}

/// Picks the view. Loading wins over error, error wins over rows.
pub fn view(state: &ListState, store: &dyn TaskStore) -> ListView {
    if state.is_loading {
        return ListView::Loading;
    }
    match store.error() {
        Some(error) if !error.is_empty() => ListView::Error(error),
        _ => ListView::Rows(store.tasks()),
    }
}

/// Borrowed inputs of a render pass.
pub struct RenderContext<'a> {
    pub state: &'a ListState,
    pub store: &'a dyn TaskStore,
    pub renderer: &'a dyn RowRenderer,
    pub viewport: &'a Viewport,
    pub on_toggle: &'a ToggleHandle,
}

/// Renders the whole screen.
pub fn render(ctx: &RenderContext<'_>, frame: &mut Frame) {
    let [list_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)])
            .areas(frame.area());

    let current = view(ctx.state, ctx.store);
    let title = match &current {
        ListView::Rows(tasks) => format!(" Tasks ({}) ", tasks.len()),
        _ => " Tasks ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = block.inner(list_area);
    frame.render_widget(block, list_area);

    render_list(ctx, &current, inner, frame.buffer_mut());
    render_footer(&current, footer_area, frame.buffer_mut());
}

/// Draws the list container contents into `area`.
pub fn render_list(ctx: &RenderContext<'_>, current: &ListView, area: Rect, buf: &mut Buffer) {
    match current {
        ListView::Loading => {
            ctx.viewport.measure(0, area.height);
            ctx.viewport.record_spans(Vec::new());
            ctx.viewport.record_hits(Vec::new());
            let spinner = SPINNER_FRAMES[ctx.state.spinner_frame % SPINNER_FRAMES.len()];
            render_centered(
                vec![
                    Line::styled(spinner, Style::default().fg(Color::Cyan)),
                    Line::from("Fetching tasks..."),
                ],
                area,
                buf,
            );
        }
        ListView::Error(message) => {
            ctx.viewport.measure(0, area.height);
            ctx.viewport.record_spans(Vec::new());
            ctx.viewport.record_hits(Vec::new());
            render_centered(
                vec![
                    Line::styled(
                        "✖ Something went wrong",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::from(message.as_str()),
                ],
                area,
                buf,
            );
        }
        ListView::Rows(tasks) => render_rows(ctx, tasks, area, buf),
    }
}

fn render_rows(ctx: &RenderContext<'_>, tasks: &[TaskRef], area: Rect, buf: &mut Buffer) {
    let state = ctx.state;
    let viewport = ctx.viewport;

    let mut spans: Vec<Range<u16>> = Vec::with_capacity(tasks.len());
    let mut top: u16 = 0;
    for task in tasks {
        let bottom = top.saturating_add(ctx.renderer.height(task));
        spans.push(top..bottom);
        top = bottom;
    }
    let content = top.saturating_add(state.extra_bottom_padding);
    viewport.measure(content, area.height);

    let gutter = viewport.right_padding().min(area.width);
    let rows_area = Rect {
        width: area.width - gutter,
        ..area
    };
    let offset = viewport.effective_offset();
    let window = offset..offset.saturating_add(area.height);

    let mut hits = Vec::new();
    let mut menu: Option<(&TaskRef, Rect)> = None;
    for (index, (task, span)) in tasks.iter().zip(&spans).enumerate() {
        // Rows cut by the window edges are skipped.
        if span.start < window.start || span.end > window.end {
            continue;
        }
        let row_area = Rect {
            y: rows_area.y + (span.start - offset),
            height: span.end - span.start,
            ..rows_area
        };
        let props = RowProps {
            task,
            is_open: state.is_open(&task.id),
            is_selected: index == state.selected,
            on_toggle: ctx.on_toggle,
        };
        ctx.renderer.render(&props, row_area, buf);
        if props.is_open {
            menu = Some((task, row_area));
        }
        hits.push(RowHit {
            index,
            id: task.id.clone(),
            area: row_area,
        });
    }

    if let Some((task, row_area)) = menu {
        let width = MENU_WIDTH.min(rows_area.width);
        let menu_area = Rect {
            x: rows_area.right().saturating_sub(width),
            y: row_area.bottom(),
            width,
            height: ctx.renderer.menu_height(task),
        }
        .intersection(rows_area);
        if !menu_area.is_empty() {
            ctx.renderer.render_menu(task, menu_area, buf);
        }
    }

    if gutter > 0 {
        let gutter_area = Rect {
            x: rows_area.right(),
            width: gutter,
            ..area
        };
        Scrollbar::new(content, area.height, offset).render(gutter_area, buf);
    }

    viewport.record_spans(spans);
    viewport.record_hits(hits);
}

fn render_centered(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect {
        y: top,
        height,
        ..area
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .render(centered, buf);
}

fn render_footer(current: &ListView, area: Rect, buf: &mut Buffer) {
    let hint = match current {
        ListView::Rows(tasks) if !tasks.is_empty() => "↑/↓ move · Enter actions · Esc close · q quit",
        _ => "q quit",
    };
    Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )))
    .render(area, buf);
}
