//! Resolves style configuration into ratatui styles.

use dashgrid_core::config::StyleConfig;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Resolved visual styles shared by every panel.
#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Style,
    pub highlight: Style,
    pub border_type: BorderType,
    pub border: Style,
    pub focused_border: Style,
    pub error_border: Style,
    pub muted: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&StyleConfig::default())
    }
}

impl Theme {
    pub fn from_config(style: &StyleConfig) -> Self {
        let text_color = parse_color(style.global.text_color.as_deref());
        let highlight_color = parse_color(style.global.highlighted_color.as_deref())
            .unwrap_or(Color::Cyan);
        let border_color = parse_color(style.border.color.as_deref()).unwrap_or(Color::Gray);
        let focused_color =
            parse_color(style.border.focused_color.as_deref()).unwrap_or(Color::Yellow);

        let text = text_color.map_or_else(Style::default, |c| Style::default().fg(c));
        Self {
            text,
            highlight: Style::default()
                .fg(highlight_color)
                .add_modifier(Modifier::BOLD),
            border_type: border_type(style.border.kind.as_deref()),
            border: Style::default().fg(border_color),
            focused_border: Style::default().fg(focused_color),
            error_border: Style::default().fg(Color::Red),
            muted: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Parses `#rrggbb`, ANSI names (`red`, `lightblue`) and 256-color indices.
fn parse_color(value: Option<&str>) -> Option<Color> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

fn border_type(kind: Option<&str>) -> BorderType {
    match kind.unwrap_or_default() {
        "rounded" => BorderType::Rounded,
        "double" => BorderType::Double,
        "normal" | "plain" => BorderType::Plain,
        "ascii" | "block" => BorderType::QuadrantOutside,
        _ => BorderType::Thick,
    }
}
