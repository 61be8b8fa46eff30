//! Task rows.
//!
//! A [`RowRenderer`] draws one task and its action menu. Rows never touch
//! list state directly: opening or closing the menu goes through the
//! [`ToggleHandle`] they receive in [`RowProps`].

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use tasklist_types::{TaskId, TaskRef};
use unicode_width::UnicodeWidthStr;

use crate::common::truncate_with_ellipsis;
use crate::events::UiEvent;
use crate::runtime::UiEventSender;

/// Toggle callback handed to rows.
///
/// Posts `UiEvent::ToggleMenu` into the controller inbox; the toggle takes
/// effect when the runtime next drains it.
#[derive(Debug, Clone)]
pub struct ToggleHandle {
    tx: UiEventSender,
}

impl ToggleHandle {
    pub fn new(tx: UiEventSender) -> Self {
        Self { tx }
    }

    pub fn toggle(&self, id: &TaskId) {
        if self.tx.send(UiEvent::ToggleMenu(id.clone())).is_err() {
            tracing::debug!(task = %id, "toggle after teardown ignored");
        }
    }
}

/// Everything a row needs to draw itself.
pub struct RowProps<'a> {
    pub task: &'a TaskRef,
    pub is_open: bool,
    pub is_selected: bool,
    pub on_toggle: &'a ToggleHandle,
}

/// Row drawing contract.
pub trait RowRenderer {
    /// Rows occupied by `task` in the list.
    fn height(&self, _task: &TaskRef) -> u16 {
        1
    }

    /// Rows occupied by the action menu overlay.
    fn menu_height(&self, task: &TaskRef) -> u16;

    fn render(&self, props: &RowProps<'_>, area: Rect, buf: &mut Buffer);

    /// Draws the action menu. `area` starts right below the row and is
    /// already clipped to the list.
    fn render_menu(&self, task: &TaskRef, area: Rect, buf: &mut Buffer);

    /// Left click at `column` (relative to the row).
    fn on_click(&self, props: &RowProps<'_>, _column: u16) {
        props.on_toggle.toggle(&props.task.id);
    }
}

/// Width of the action menu overlay.
pub const MENU_WIDTH: u16 = 32;

const MENU_MARKER: &str = " ⋮ ";

/// Default row: checkbox, title, optional description line, menu marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskRow;

impl TaskRow {
    fn status(task: &TaskRef) -> &'static str {
        if task.payload.completed {
            "done"
        } else {
            "open"
        }
    }
}

impl RowRenderer for TaskRow {
    fn height(&self, task: &TaskRef) -> u16 {
        if task.payload.description.is_some() {
            2
        } else {
            1
        }
    }

    fn menu_height(&self, _task: &TaskRef) -> u16 {
        // Two lines plus borders.
        4
    }

    fn render(&self, props: &RowProps<'_>, area: Rect, buf: &mut Buffer) {
        let task = props.task;
        let checkbox = if task.payload.completed { "[x] " } else { "[ ] " };
        let marker = if props.is_open { " ▾ " } else { MENU_MARKER };
        let budget = (area.width as usize)
            .saturating_sub(checkbox.width() + marker.width());
        let title = truncate_with_ellipsis(task.title(), budget);
        let fill = budget.saturating_sub(title.width());

        let mut title_style = Style::default();
        if task.payload.completed {
            title_style = title_style
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        let mut line = Line::from(vec![
            Span::styled(checkbox, Style::default().fg(Color::Cyan)),
            Span::styled(title, title_style),
            Span::raw(" ".repeat(fill)),
            Span::styled(marker, Style::default().fg(Color::Magenta)),
        ]);
        if props.is_selected {
            line = line.style(Style::default().add_modifier(Modifier::REVERSED));
        }

        let mut lines = vec![line];
        if let Some(description) = &task.payload.description {
            let indent = "    ";
            let text = truncate_with_ellipsis(
                description,
                (area.width as usize).saturating_sub(indent.len()),
            );
            lines.push(Line::from(vec![
                Span::raw(indent),
                Span::styled(text, Style::default().fg(Color::DarkGray)),
            ]));
        }
        Paragraph::new(lines).render(area, buf);
    }

    fn render_menu(&self, task: &TaskRef, area: Rect, buf: &mut Buffer) {
        let created = task.payload.created_at.map_or_else(
            || "unknown".to_string(),
            |at| at.format("%Y-%m-%d %H:%M").to_string(),
        );
        let inner_width = area.width.saturating_sub(2) as usize;
        let lines = vec![
            Line::from(truncate_with_ellipsis(
                &format!("Status: {} · Id: {}", Self::status(task), task.id),
                inner_width,
            )),
            Line::from(truncate_with_ellipsis(
                &format!("Created: {created}"),
                inner_width,
            )),
        ];

        Clear.render(area, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(" Actions "),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_toggle_handle_posts_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ToggleHandle::new(tx);

        handle.toggle(&TaskId::new("a"));

        match rx.try_recv() {
            Ok(UiEvent::ToggleMenu(id)) => assert_eq!(id, TaskId::new("a")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_toggle_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ToggleHandle::new(tx).toggle(&TaskId::new("a"));
    }

    #[test]
    fn test_default_click_toggles() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ToggleHandle::new(tx);
        let task = TaskRef::new("a", "A");
        let props = RowProps {
            task: &task,
            is_open: false,
            is_selected: false,
            on_toggle: &handle,
        };

        TaskRow.on_click(&props, 0);

        assert!(matches!(rx.try_recv(), Ok(UiEvent::ToggleMenu(_))));
    }

    #[test]
    fn test_row_renders_checkbox_title_and_marker() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = ToggleHandle::new(tx);
        let task = TaskRef::new("a", "Water the plants");
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);

        TaskRow.render(
            &RowProps {
                task: &task,
                is_open: false,
                is_selected: false,
                on_toggle: &handle,
            },
            area,
            &mut buf,
        );

        let text = buffer_text(&buf);
        assert!(text.starts_with("[ ] Water the plants"));
        assert!(text.trim_end().ends_with('⋮'));
    }

    #[test]
    fn test_description_adds_a_line() {
        let mut task = TaskRef::new("a", "A");
        assert_eq!(TaskRow.height(&task), 1);
        task.payload.description = Some("details".into());
        assert_eq!(TaskRow.height(&task), 2);
    }

    #[test]
    fn test_menu_shows_status_and_id() {
        let task = TaskRef::new("t-9", "A");
        let area = Rect::new(0, 0, MENU_WIDTH, 4);
        let mut buf = Buffer::empty(area);

        TaskRow.render_menu(&task, area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Actions"));
        assert!(text.contains("Status: open"));
        assert!(text.contains("Id: t-9"));
        assert!(text.contains("Created: unknown"));
    }

    #[test]
    fn test_menu_formats_creation_time() {
        use chrono::{TimeZone, Utc};

        let mut task = TaskRef::new("t-1", "A");
        task.payload.created_at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).single();
        let area = Rect::new(0, 0, MENU_WIDTH, 4);
        let mut buf = Buffer::empty(area);

        TaskRow.render_menu(&task, area, &mut buf);

        assert!(buffer_text(&buf).contains("Created: 2024-03-05 09:30"));
    }
}
