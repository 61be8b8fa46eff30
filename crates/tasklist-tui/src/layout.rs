//! Layout capability of the list container.
//!
//! The controller never measures anything itself. It reads extents and writes
//! scroll offset / right padding through a [`LayoutProbe`] supplied by the
//! host. [`Viewport`] is the terminal implementation; it is measured during
//! each render and therefore uses interior mutability.

use std::cell::{Cell, RefCell};
use std::ops::Range;

use ratatui::layout::{Position, Rect};
use tasklist_types::TaskId;

/// Scroll metrics and layout writes of a scrollable container.
pub trait LayoutProbe {
    /// Total height of the content, including the bottom inset.
    fn content_extent(&self) -> u16;

    /// Height of the visible window.
    fn visible_extent(&self) -> u16;

    fn scroll_offset(&self) -> u16;

    fn set_scroll_offset(&mut self, offset: u16);

    fn set_right_padding(&mut self, padding: u16);

    /// Content span `[top, bottom)` of row `index`, if known.
    fn row_span(&self, _index: usize) -> Option<Range<u16>> {
        None
    }

    fn max_scroll_offset(&self) -> u16 {
        self.content_extent().saturating_sub(self.visible_extent())
    }
}

/// Sets the right padding to `padding` if the content overflows, else 0.
pub fn recompute_padding<P: LayoutProbe>(probe: Option<&mut P>, padding: u16) {
    let Some(probe) = probe else {
        return;
    };
    let overflows = probe.content_extent() > probe.visible_extent();
    probe.set_right_padding(if overflows { padding } else { 0 });
}

/// Scrolls to the maximum offset.
pub fn scroll_to_end<P: LayoutProbe>(probe: Option<&mut P>) {
    if let Some(probe) = probe {
        let end = probe.max_scroll_offset();
        probe.set_scroll_offset(end);
    }
}

/// Scrolls by `delta` rows, clamped to `[0, max]`.
pub fn scroll_by<P: LayoutProbe>(probe: Option<&mut P>, delta: i32) {
    if let Some(probe) = probe {
        let target = i32::from(probe.scroll_offset()) + delta;
        let clamped = target.clamp(0, i32::from(probe.max_scroll_offset()));
        probe.set_scroll_offset(clamped as u16);
    }
}

/// Scrolls one visible window up or down.
pub fn scroll_page<P: LayoutProbe>(probe: Option<&mut P>, down: bool) {
    if let Some(probe) = probe {
        let page = i32::from(probe.visible_extent().max(1));
        scroll_by(Some(probe), if down { page } else { -page });
    }
}

/// Adjusts the offset minimally so row `index` is fully visible.
pub fn reveal_row<P: LayoutProbe>(probe: Option<&mut P>, index: usize) {
    let Some(probe) = probe else {
        return;
    };
    let Some(span) = probe.row_span(index) else {
        return;
    };
    let offset = probe.scroll_offset();
    let visible = probe.visible_extent();
    if span.start < offset {
        probe.set_scroll_offset(span.start);
    } else if span.end > offset.saturating_add(visible) {
        let target = span.end.saturating_sub(visible).min(probe.max_scroll_offset());
        probe.set_scroll_offset(target);
    }
}

/// Screen rectangle of a rendered row, for mouse hit-testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    pub index: usize,
    pub id: TaskId,
    pub area: Rect,
}

/// Terminal list container.
#[derive(Debug, Default)]
pub struct Viewport {
    content: Cell<u16>,
    visible: Cell<u16>,
    offset: Cell<u16>,
    right_padding: Cell<u16>,
    spans: RefCell<Vec<Range<u16>>>,
    hits: RefCell<Vec<RowHit>>,
}

impl Viewport {
    /// Records the extents measured by the latest render.
    pub fn measure(&self, content: u16, visible: u16) {
        self.content.set(content);
        self.visible.set(visible);
    }

    /// Records row spans in content coordinates.
    pub fn record_spans(&self, spans: Vec<Range<u16>>) {
        *self.spans.borrow_mut() = spans;
    }

    /// Records the rows drawn on screen.
    pub fn record_hits(&self, hits: Vec<RowHit>) {
        *self.hits.borrow_mut() = hits;
    }

    pub fn right_padding(&self) -> u16 {
        self.right_padding.get()
    }

    /// Offset clamped to the current extents.
    pub fn effective_offset(&self) -> u16 {
        self.offset.get().min(self.max_scroll_offset())
    }

    /// Row drawn at the given screen cell.
    pub fn row_at(&self, column: u16, row: u16) -> Option<RowHit> {
        let position = Position::new(column, row);
        self.hits
            .borrow()
            .iter()
            .find(|hit| hit.area.contains(position))
            .cloned()
    }
}

impl LayoutProbe for Viewport {
    fn content_extent(&self) -> u16 {
        self.content.get()
    }

    fn visible_extent(&self) -> u16 {
        self.visible.get()
    }

    fn scroll_offset(&self) -> u16 {
        self.offset.get()
    }

    fn set_scroll_offset(&mut self, offset: u16) {
        self.offset.set(offset);
    }

    fn set_right_padding(&mut self, padding: u16) {
        self.right_padding.set(padding);
    }

    fn row_span(&self, index: usize) -> Option<Range<u16>> {
        self.spans.borrow().get(index).cloned()
    }
}
