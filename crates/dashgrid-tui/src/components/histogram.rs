//! Histogram panel: labelled horizontal bars in a scrollable viewport.

use std::collections::BTreeMap;

use crossterm::event::Event;
use dashgrid_core::fetch::FetchResult;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::{LOADING, NO_DATA, TOO_SMALL, error_text, render_placeholder, render_viewport};
use crate::common::{ScrollViewport, scroll_action};
use crate::theme::Theme;

const MIN_LABEL_WIDTH: usize = 10;
const MAX_LABEL_WIDTH: usize = 20;
const MIN_WIDTH: u16 = 5;

pub type Bins = BTreeMap<String, i64>;

#[derive(Debug)]
pub struct HistogramPanel {
    bins: Bins,
    error: Option<String>,
    loaded: bool,
    viewport: ScrollViewport,
    caption: Option<String>,
}

impl HistogramPanel {
    pub fn new(caption: Option<String>) -> Self {
        Self {
            bins: Bins::new(),
            error: None,
            loaded: false,
            viewport: ScrollViewport::default(),
            caption,
        }
    }

    pub fn bins(&self) -> &Bins {
        &self.bins
    }

    /// Bin labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.bins.keys().map(String::as_str).collect()
    }

    pub fn max_value(&self) -> i64 {
        self.bins.values().copied().max().unwrap_or(0)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_content(&mut self, result: &FetchResult) {
        self.loaded = true;
        let parsed = match &result.error {
            Some(error) => Err(error.clone()),
            None => parse_histogram(result.text_output()),
        };
        match parsed {
            Ok(bins) => {
                self.error = None;
                self.bins = bins;
            }
            Err(error) => {
                self.error = Some(error);
                self.bins.clear();
            }
        }
    }

    pub fn update(&mut self, event: &Event) {
        if let Some(action) = scroll_action(event) {
            self.viewport.apply(action);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(error) = &self.error {
            render_placeholder(frame, area, &error_text(error), theme.muted);
            return;
        }
        if !self.loaded {
            render_placeholder(frame, area, LOADING, theme.muted);
            return;
        }
        if self.bins.is_empty() {
            render_placeholder(frame, area, NO_DATA, theme.muted);
            return;
        }
        if area.width < MIN_WIDTH {
            render_placeholder(frame, area, TOO_SMALL, theme.muted);
            return;
        }

        let bar_style = theme.highlight;
        render_viewport(
            frame,
            area,
            &self.viewport,
            self.caption.as_deref(),
            theme,
            |width| {
                histogram_rows(&self.bins, width)
                    .into_iter()
                    .map(|(prefix, bar)| {
                        Line::from(vec![
                            Span::styled(prefix, theme.text),
                            Span::styled(bar, bar_style),
                        ])
                    })
                    .collect()
            },
        );
    }
}

/// Lays out one `(label [count] | , bar)` pair per bin for a given width.
fn histogram_rows(bins: &Bins, width: usize) -> Vec<(String, String)> {
    let label_width = bins
        .keys()
        .map(|label| label.width())
        .max()
        .unwrap_or(0)
        .clamp(MIN_LABEL_WIDTH, MAX_LABEL_WIDTH);
    let max_value = bins.values().copied().max().unwrap_or(0);

    bins.iter()
        .map(|(label, count)| {
            let label = if label.width() > label_width {
                let kept: String = label.chars().take(label_width - 3).collect();
                format!("{kept}...")
            } else {
                label.clone()
            };
            let count_text = count.to_string();
            let max_bar = width.saturating_sub(label_width + count_text.len() + 7);
            let bar_len = if max_value > 0 {
                (*count as f64 / max_value as f64 * max_bar as f64) as usize
            } else {
                0
            };
            (
                format!("{label:<label_width$} [{count_text}] | "),
                "█".repeat(bar_len.max(1)),
            )
        })
        .collect()
}

/// Parses histogram bins.
///
/// JSON objects map labels to counts (non-numeric values count once), JSON
/// arrays count how often each value occurs. Anything that is not JSON is
/// read line by line as `label: count` or a bare label counted once.
///
/// # Errors
/// Returns an error for JSON that is neither an object nor an array.
pub fn parse_histogram(raw: &str) -> Result<Bins, String> {
    let mut bins = Bins::new();

    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        match value {
            Value::Object(map) => {
                for (label, value) in map {
                    let count = value.as_f64().map_or(1, |n| n as i64);
                    bins.insert(label, count);
                }
            }
            Value::Array(values) => {
                for value in values {
                    let label = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    *bins.entry(label).or_default() += 1;
                }
            }
            _ => {
                return Err(
                    "unsupported JSON format: expected an object of counts or an array of values"
                        .to_string(),
                );
            }
        }
        return Ok(bins);
    }

    for line in raw.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((label, count)) => {
                let increment = count.trim().parse::<i64>().unwrap_or(1);
                *bins.entry(label.trim().to_string()).or_default() += increment;
            }
            None => *bins.entry(line.to_string()).or_default() += 1,
        }
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use dashgrid_core::config::ComponentId;
    use dashgrid_core::fetch::SourceOutput;

    use super::*;

    #[test]
    fn test_json_object_bins() {
        let mut panel = HistogramPanel::new(None);
        panel.set_content(&FetchResult::text(
            ComponentId::new("h"),
            SourceOutput::ok(r#"{"b": 5, "a": 2}"#),
        ));
        assert_eq!(panel.labels(), ["a", "b"]);
        assert_eq!(panel.bins()["a"], 2);
        assert_eq!(panel.max_value(), 5);
    }

    #[test]
    fn test_json_object_non_numeric_counts_once() {
        let bins = parse_histogram(r#"{"x": "many", "y": 3.9}"#).unwrap();
        assert_eq!(bins["x"], 1);
        assert_eq!(bins["y"], 3);
    }

    #[test]
    fn test_json_array_frequencies() {
        let bins = parse_histogram(r#"["get", "put", "get", 404, 404, 404]"#).unwrap();
        assert_eq!(bins["get"], 2);
        assert_eq!(bins["put"], 1);
        assert_eq!(bins["404"], 3);
    }

    #[test]
    fn test_json_scalar_is_error() {
        assert!(parse_histogram("true").is_err());
    }

    #[test]
    fn test_line_pairs_and_bare_labels() {
        let bins = parse_histogram("ok: 4\nfail: x\nok: 2\nwarn\n\nwarn\n").unwrap();
        assert_eq!(bins["ok"], 6);
        assert_eq!(bins["fail"], 1);
        assert_eq!(bins["warn"], 2);
    }

    #[test]
    fn test_fetch_error_clears_bins() {
        let id = ComponentId::new("h");
        let mut panel = HistogramPanel::new(None);
        panel.set_content(&FetchResult::text(id.clone(), SourceOutput::ok("a: 1")));
        panel.set_content(&FetchResult::text(id, SourceOutput::failed("boom")));
        assert!(panel.bins().is_empty());
        assert_eq!(panel.error(), Some("boom"));
    }

    #[test]
    fn test_rows_scale_to_max() {
        let bins = parse_histogram(r#"{"a": 10, "b": 5, "c": 0}"#).unwrap();
        // label 10 + " [10] | " leaves 40 - 10 - 2 - 7 = 21 cells for the bar.
        let rows = histogram_rows(&bins, 40);
        assert_eq!(rows[0].0, "a          [10] | ");
        assert_eq!(rows[0].1.chars().count(), 21);
        assert_eq!(rows[1].1.chars().count(), 11);
        assert_eq!(rows[2].1.chars().count(), 1);
    }

    #[test]
    fn test_long_labels_truncated() {
        let bins = parse_histogram("a_really_long_label_name_here: 3").unwrap();
        let rows = histogram_rows(&bins, 60);
        assert!(rows[0].0.starts_with("a_really_long_lab... [3]"));
    }
}
