//! List panel: one selectable item per line of output.

use crossterm::event::Event;
use dashgrid_core::config::SourceKind;
use dashgrid_core::fetch::FetchResult;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{List, ListItem, ListState};

use super::{LOADING, NO_DATA, render_placeholder, render_status};
use crate::common::text::sanitize_for_display;
use crate::common::{Selection, scroll_action};
use crate::theme::Theme;

#[derive(Debug)]
pub struct ListPanel {
    source: SourceKind,
    items: Vec<String>,
    loaded: bool,
    selection: Selection,
    caption: Option<String>,
}

impl ListPanel {
    pub fn new(source: SourceKind, caption: Option<String>) -> Self {
        Self {
            source,
            items: Vec::new(),
            loaded: false,
            selection: Selection::default(),
            caption,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selection.selected()
    }

    pub fn set_content(&mut self, result: &FetchResult) {
        self.loaded = true;
        self.items = match &result.error {
            Some(error) => vec![format!("[Error: {error}]")],
            None => parse_list_items(self.source, result.text_output()),
        };
        self.selection.clamp(self.items.len());
    }

    pub fn update(&mut self, event: &Event) {
        if let Some(action) = scroll_action(event) {
            self.selection.apply(action, self.items.len());
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if !self.loaded {
            render_placeholder(frame, area, LOADING, theme.muted);
            return;
        }
        if self.items.is_empty() {
            render_placeholder(frame, area, NO_DATA, theme.muted);
            return;
        }

        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        self.selection.set_page_rows(body.height as usize);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem::new(sanitize_for_display(item).into_owned()))
            .collect();
        let highlight = if focused {
            theme.highlight
        } else {
            theme.text
        };
        let list = List::new(items)
            .style(theme.text)
            .highlight_style(highlight)
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.selection.selected()));
        frame.render_stateful_widget(list, body, &mut state);

        let position = format!("{}/{}", self.selection.selected() + 1, self.items.len());
        render_status(frame, status, self.caption.as_deref(), &position, theme);
    }
}

/// Splits fetch output into list items.
///
/// Script output yields one trimmed item per non-blank line. API output is decoded as
/// a JSON array with every element stringified; anything else becomes a single
/// item holding the trimmed raw text.
pub fn parse_list_items(source: SourceKind, raw: &str) -> Vec<String> {
    match source {
        SourceKind::Api => match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
            Ok(values) => values
                .into_iter()
                .map(|value| match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Err(_) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![trimmed.to_string()]
                }
            }
        },
        SourceKind::Script | SourceKind::Other => raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
