//! Text panel: raw command or API output in a scrollable viewport.

use std::borrow::Cow;

use crossterm::event::Event;
use dashgrid_core::fetch::FetchResult;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;

use super::{LOADING, render_viewport};
use crate::common::text::{sanitize_for_display, wrap_lines};
use crate::common::{ScrollViewport, scroll_action};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TextContent {
    Loading,
    Ready(String),
    Failed(String),
}

#[derive(Debug)]
pub struct TextPanel {
    content: TextContent,
    viewport: ScrollViewport,
    caption: Option<String>,
}

impl TextPanel {
    pub fn new(caption: Option<String>) -> Self {
        Self {
            content: TextContent::Loading,
            viewport: ScrollViewport::default(),
            caption,
        }
    }

    /// Text shown in the viewport.
    pub fn display_text(&self) -> Cow<'_, str> {
        match &self.content {
            TextContent::Loading => Cow::Borrowed(LOADING),
            TextContent::Ready(text) => Cow::Borrowed(text),
            TextContent::Failed(error) => Cow::Owned(format!("[error]\n{error}")),
        }
    }

    pub fn set_content(&mut self, result: &FetchResult) {
        self.content = match &result.error {
            Some(error) => TextContent::Failed(error.clone()),
            None => TextContent::Ready(
                sanitize_for_display(result.text_output().trim_end()).into_owned(),
            ),
        };
    }

    pub fn update(&mut self, event: &Event) {
        if let Some(action) = scroll_action(event) {
            self.viewport.apply(action);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let text = self.display_text();
        render_viewport(
            frame,
            area,
            &self.viewport,
            self.caption.as_deref(),
            theme,
            |width| {
                wrap_lines(&text, width)
                    .into_iter()
                    .map(Line::from)
                    .collect()
            },
        );
    }
}
