//! Chart panel: a braille line plot of numeric samples.

use dashgrid_core::config::RefreshMode;
use dashgrid_core::fetch::FetchResult;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};

use super::{LOADING, NO_DATA, TOO_SMALL, error_text, render_placeholder};
use crate::theme::Theme;

const MIN_WIDTH: u16 = 10;
const MIN_HEIGHT: u16 = 3;

#[derive(Debug)]
pub struct ChartPanel {
    mode: RefreshMode,
    points: Vec<f64>,
    error: Option<String>,
    loaded: bool,
    caption: Option<String>,
}

impl ChartPanel {
    pub fn new(mode: RefreshMode, caption: Option<String>) -> Self {
        Self {
            mode,
            points: Vec::new(),
            error: None,
            loaded: false,
            caption,
        }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Applies a fetch result. In append mode a failure keeps the
    /// accumulated series so the next good sample extends it.
    pub fn set_content(&mut self, result: &FetchResult) {
        self.loaded = true;
        let parsed = match &result.error {
            Some(error) => Err(error.clone()),
            None => parse_chart_points(result.text_output())
                .map_err(|e| format!("failed to parse chart data: {e}")),
        };
        match parsed {
            Ok(points) => {
                self.error = None;
                match self.mode {
                    RefreshMode::Append => self.points.extend(points),
                    RefreshMode::Replace => self.points = points,
                }
            }
            Err(error) => {
                self.error = Some(error);
                if self.mode == RefreshMode::Replace {
                    self.points.clear();
                }
            }
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
        if self.points.is_empty() {
            render_placeholder(frame, area, NO_DATA, theme.muted);
            return;
        }
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            render_placeholder(frame, area, TOO_SMALL, theme.muted);
            return;
        }

        let data: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, y)| (i as f64, *y))
            .collect();
        let (low, high) = y_bounds(&self.points);
        let last = (self.points.len() - 1).max(1) as f64;

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.highlight)
            .data(&data);

        let mut x_axis = Axis::default().style(theme.muted).bounds([0.0, last]);
        if let Some(caption) = &self.caption {
            x_axis = x_axis.title(caption.clone());
        }
        let y_axis = Axis::default()
            .style(theme.muted)
            .bounds([low, high])
            .labels([
                format_value(low),
                format_value((low + high) / 2.0),
                format_value(high),
            ]);

        let chart = Chart::new(vec![dataset])
            .style(theme.text)
            .x_axis(x_axis)
            .y_axis(y_axis);
        frame.render_widget(chart, area);
    }
}

/// Y range of the series, widened when every sample is equal.
fn y_bounds(points: &[f64]) -> (f64, f64) {
    let low = points.iter().copied().fold(f64::INFINITY, f64::min);
    let high = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (high - low).abs() < f64::EPSILON {
        (low - 1.0, high + 1.0)
    } else {
        (low, high)
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Parses samples as a JSON number array, falling back to one number per
/// non-blank line.
///
/// # Errors
/// Returns an error for an empty JSON array, any unparseable line, or input
/// without samples.
pub fn parse_chart_points(raw: &str) -> Result<Vec<f64>, String> {
    if let Ok(points) = serde_json::from_str::<Vec<f64>>(raw) {
        if points.is_empty() {
            return Err("data source returned an empty JSON array".to_string());
        }
        return Ok(points);
    }

    let mut points = Vec::new();
    for line in raw.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<f64>() {
            Ok(value) if value.is_finite() => points.push(value),
            _ => return Err(format!("failed to parse line '{line}' as a number")),
        }
    }

    if points.is_empty() {
        return Err("no data points found".to_string());
    }
    Ok(points)
}
