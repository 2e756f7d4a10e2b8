//! Stand-in for a component whose configuration could not be used.

use dashgrid_core::config::ComponentId;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::render_placeholder;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    message: String,
    kind: String,
    id: ComponentId,
}

impl ErrorPanel {
    pub fn new(message: impl Into<String>, kind: impl Into<String>, id: ComponentId) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
            id,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn display_text(&self) -> String {
        format!("[Error: {}]\nType: {}\nID: {}", self.message, self.kind, self.id)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        render_placeholder(frame, area, &self.display_text(), theme.text);
    }
}
