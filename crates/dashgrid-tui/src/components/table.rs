//! Table panel: JSON rows laid out in configured columns.

use crossterm::event::Event;
use dashgrid_core::config::ColumnConfig;
use dashgrid_core::fetch::FetchResult;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::widgets::{Row, Table, TableState};
use serde_json::Value;

use super::{LOADING, NO_DATA, error_text, render_placeholder, render_status};
use crate::common::{Selection, scroll_action};
use crate::theme::Theme;

#[derive(Debug)]
pub struct TablePanel {
    columns: Vec<ColumnConfig>,
    rows: Vec<Vec<String>>,
    error: Option<String>,
    loaded: bool,
    selection: Selection,
    caption: Option<String>,
}

impl TablePanel {
    pub fn new(columns: Vec<ColumnConfig>, caption: Option<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            error: None,
            loaded: false,
            selection: Selection::default(),
            caption,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_content(&mut self, result: &FetchResult) {
        self.loaded = true;
        if let Some(error) = &result.error {
            self.error = Some(error.clone());
            self.rows.clear();
        } else {
            match parse_table_rows(result.text_output(), &self.columns) {
                Ok(rows) => {
                    self.error = None;
                    self.rows = rows;
                    self.selection.select(0, self.rows.len());
                }
                Err(e) => {
                    self.error = Some(format!("Failed to parse table data: {e}"));
                    self.rows.clear();
                }
            }
        }
        self.selection.clamp(self.rows.len());
    }

    pub fn update(&mut self, event: &Event) {
        if let Some(action) = scroll_action(event) {
            self.selection.apply(action, self.rows.len());
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if let Some(error) = &self.error {
            render_placeholder(frame, area, &error_text(error), theme.muted);
            return;
        }
        if !self.loaded {
            render_placeholder(frame, area, LOADING, theme.muted);
            return;
        }
        if self.rows.is_empty() {
            render_placeholder(frame, area, NO_DATA, theme.muted);
            return;
        }

        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        // Header row plus its margin.
        self.selection
            .set_page_rows((body.height as usize).saturating_sub(2));

        let header = Row::new(self.columns.iter().map(|c| c.label.clone()))
            .style(theme.text.add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let rows = self.rows.iter().map(|row| Row::new(row.clone()));
        let widths = self
            .columns
            .iter()
            .map(|c| Constraint::Fill(u16::try_from(c.weight()).unwrap_or(u16::MAX)));
        let highlight = if focused {
            theme.highlight
        } else {
            theme.text
        };
        let table = Table::new(rows, widths)
            .header(header)
            .style(theme.text)
            .column_spacing(1)
            .row_highlight_style(highlight)
            .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(self.selection.selected()));
        frame.render_stateful_widget(table, body, &mut state);

        let position = format!("{}/{}", self.selection.selected() + 1, self.rows.len());
        render_status(frame, status, self.caption.as_deref(), &position, theme);
    }
}

/// Parses a JSON array into table rows.
///
/// Rows are either all positional arrays (padded or truncated to the column
/// count) or all objects (cells looked up by each column's `field`).
///
/// # Errors
/// Returns an error for an empty column list, invalid JSON, a non-array top
/// level, or mixed row shapes.
pub fn parse_table_rows(raw: &str, columns: &[ColumnConfig]) -> Result<Vec<Vec<String>>, String> {
    if columns.is_empty() {
        return Err("cannot parse table data without column definitions".to_string());
    }

    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| format!("failed to parse input as JSON: {e}"))?;
    let Value::Array(elements) = parsed else {
        return Err("unsupported JSON structure: expected a top-level array".to_string());
    };

    let Some(first) = elements.first() else {
        return Ok(Vec::new());
    };

    match first {
        Value::Array(_) => elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let Value::Array(cells) = element else {
                    return Err(format!("expected an array at index {i}"));
                };
                Ok((0..columns.len())
                    .map(|j| cells.get(j).map(cell_text).unwrap_or_default())
                    .collect())
            })
            .collect(),
        Value::Object(_) => elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let Value::Object(map) = element else {
                    return Err(format!("expected an object at index {i}"));
                };
                Ok(columns
                    .iter()
                    .map(|column| {
                        column
                            .field
                            .as_deref()
                            .filter(|field| !field.is_empty())
                            .and_then(|field| map.get(field))
                            .map(cell_text)
                            .unwrap_or_default()
                    })
                    .collect())
            })
            .collect(),
        _ => Err(
            "unsupported JSON structure: expected an array of arrays or an array of objects"
                .to_string(),
        ),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
