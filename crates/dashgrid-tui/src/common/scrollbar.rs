//! Scrollbar for panel viewports.
//!
//! The thumb length is computed once from the content/viewport ratio so it
//! does not change size while scrolling, and it reaches the last row exactly
//! at the maximum offset.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

/// Vertical scrollbar drawn in the rightmost column of its area.
#[derive(Debug, Clone)]
pub struct Scrollbar {
    total_lines: usize,
    visible_lines: usize,
    offset: usize,
    style: Style,
}

impl Scrollbar {
    pub fn new(total_lines: usize, visible_lines: usize, offset: usize) -> Self {
        Self {
            total_lines,
            visible_lines,
            offset,
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn should_display(&self) -> bool {
        self.total_lines > self.visible_lines
    }

    /// Returns `(thumb_start, thumb_len)` for a track of `track_len` rows.
    fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_offset = self.total_lines.saturating_sub(self.visible_lines);
        if track_len == 0 || max_offset == 0 {
            return None;
        }
        let visible = self.visible_lines.min(track_len);
        let thumb_len = (track_len * visible)
            .div_ceil(self.total_lines.max(1))
            .clamp(1, track_len);
        let travel = track_len - thumb_len;
        let start = self.offset.min(max_offset) * travel / max_offset;
        Some((start, thumb_len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.should_display() {
            return;
        }
        let Some((start, len)) = self.thumb(area.height as usize) else {
            return;
        };

        let x = area.x + area.width.saturating_sub(1);
        for (idx, y) in (area.y..area.y + area.height).enumerate() {
            let symbol = if (start..start + len).contains(&idx) {
                THUMB_SYMBOL
            } else {
                TRACK_SYMBOL
            };
            buf.set_string(x, y, symbol, self.style);
        }
    }
}
