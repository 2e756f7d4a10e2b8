//! Scroll and selection state shared by panels.
//!
//! Panels record their visible extent during render (through `Cell`s, since
//! render only gets `&self`) and key handling clamps against it.

use std::cell::Cell;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// Lines moved per mouse wheel step.
const WHEEL_STEP: usize = 3;

/// A panel-local scroll/selection command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    Up(usize),
    Down(usize),
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Maps a terminal event to a scroll action.
///
/// Shifted arrows and uppercase navigation letters are global focus keys and
/// never reach panels, so plain arrows and lowercase vim keys are safe here.
pub fn scroll_action(event: &Event) -> Option<ScrollAction> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                return None;
            }
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(ScrollAction::Up(1)),
                KeyCode::Down | KeyCode::Char('j') => Some(ScrollAction::Down(1)),
                KeyCode::PageUp => Some(ScrollAction::PageUp),
                KeyCode::PageDown => Some(ScrollAction::PageDown),
                KeyCode::Home | KeyCode::Char('g') => Some(ScrollAction::Top),
                KeyCode::End | KeyCode::Char('G') => Some(ScrollAction::Bottom),
                _ => None,
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(ScrollAction::Up(WHEEL_STEP)),
            MouseEventKind::ScrollDown => Some(ScrollAction::Down(WHEEL_STEP)),
            _ => None,
        },
        _ => None,
    }
}

/// Vertical scroll offset of a read-only viewport.
#[derive(Debug, Default)]
pub struct ScrollViewport {
    offset: usize,
    total_lines: Cell<usize>,
    visible_lines: Cell<usize>,
}

impl ScrollViewport {
    /// Records the content and viewport size of the last render.
    pub fn set_metrics(&self, total_lines: usize, visible_lines: usize) {
        self.total_lines.set(total_lines);
        self.visible_lines.set(visible_lines);
    }

    fn max_offset(&self) -> usize {
        self.total_lines
            .get()
            .saturating_sub(self.visible_lines.get())
    }

    /// Current offset clamped to the last known metrics.
    pub fn offset(&self) -> usize {
        self.offset.min(self.max_offset())
    }

    /// Fraction scrolled, 1.0 when everything fits.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_offset();
        if max == 0 {
            return 1.0;
        }
        self.offset() as f64 / max as f64
    }

    pub fn apply(&mut self, action: ScrollAction) {
        let page = self.visible_lines.get().max(1);
        let current = self.offset();
        self.offset = match action {
            ScrollAction::Up(n) => current.saturating_sub(n),
            ScrollAction::Down(n) => current.saturating_add(n),
            ScrollAction::PageUp => current.saturating_sub(page),
            ScrollAction::PageDown => current.saturating_add(page),
            ScrollAction::Top => 0,
            ScrollAction::Bottom => self.max_offset(),
        }
        .min(self.max_offset());
    }
}

/// Selected row of a list-like panel.
#[derive(Debug, Default)]
pub struct Selection {
    selected: usize,
    page_rows: Cell<usize>,
}

impl Selection {
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Records how many rows the last render showed.
    pub fn set_page_rows(&self, rows: usize) {
        self.page_rows.set(rows);
    }

    pub fn select(&mut self, index: usize, len: usize) {
        self.selected = index.min(len.saturating_sub(1));
    }

    /// Clamps the selection after the item count changed.
    pub fn clamp(&mut self, len: usize) {
        self.select(self.selected, len);
    }

    pub fn apply(&mut self, action: ScrollAction, len: usize) {
        let page = self.page_rows.get().max(1);
        let next = match action {
            ScrollAction::Up(n) => self.selected.saturating_sub(n),
            ScrollAction::Down(n) => self.selected.saturating_add(n),
            ScrollAction::PageUp => self.selected.saturating_sub(page),
            ScrollAction::PageDown => self.selected.saturating_add(page),
            ScrollAction::Top => 0,
            ScrollAction::Bottom => len.saturating_sub(1),
        };
        self.select(next, len);
    }
}
