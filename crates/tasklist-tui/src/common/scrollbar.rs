//! Scrollbar drawn inside the list's right padding gutter.
//!
//! The thumb length is computed once from the extents so it does not change
//! size while scrolling, and it touches the bottom of the track exactly at the
//! maximum offset.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

#[derive(Debug, Clone, Copy)]
pub struct Scrollbar {
    content_extent: u16,
    visible_extent: u16,
    offset: u16,
}

impl Scrollbar {
    pub fn new(content_extent: u16, visible_extent: u16, offset: u16) -> Self {
        Self {
            content_extent,
            visible_extent,
            offset,
        }
    }

    fn overflows(&self) -> bool {
        self.content_extent > self.visible_extent
    }

    /// Returns `(thumb_start, thumb_len)` for a track of `track_len` cells.
    fn thumb(&self, track_len: u16) -> Option<(u16, u16)> {
        let max_offset = self.content_extent.saturating_sub(self.visible_extent);
        if !self.overflows() || track_len == 0 || max_offset == 0 {
            return None;
        }

        let track = u32::from(track_len);
        let visible = u32::from(self.visible_extent.min(track_len));
        let denom = u32::from(self.content_extent).saturating_sub(1) + visible;
        let thumb_len = if denom > 0 {
            ((track * visible + denom / 2) / denom).clamp(1, track)
        } else {
            track
        };

        let available = track - thumb_len;
        let offset = u32::from(self.offset.min(max_offset));
        let thumb_start = offset * available / u32::from(max_offset);
        Some((thumb_start as u16, thumb_len as u16))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((thumb_start, thumb_len)) = self.thumb(area.height) else {
            return;
        };

        // Rightmost column of the gutter.
        let x = area.x + area.width.saturating_sub(1);
        let style = Style::default().fg(Color::DarkGray);
        for (idx, y) in (area.y..area.y + area.height).enumerate() {
            let idx = idx as u16;
            let symbol = if idx >= thumb_start && idx < thumb_start + thumb_len {
                THUMB_SYMBOL
            } else {
                TRACK_SYMBOL
            };
            buf.set_string(x, y, symbol, style);
        }
    }
}
