//! Pure view functions for the dashboard.
//!
//! Rendering takes `&AppState` and never mutates state or returns effects.
//! Panels record scroll metrics through interior cells only.

use dashgrid_core::layout::BoundingBox;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::state::AppState;

/// Renders every panel into its bounding box.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    for id in &app.order {
        let (Some(panel), Some(bounds)) = (app.panels.get(id), app.boxes.get(id)) else {
            continue;
        };
        let rect = to_rect(*bounds).intersection(area);
        if rect.is_empty() {
            continue;
        }
        let focused = app.focus.as_ref() == Some(id);
        panel.render(frame, rect, focused, &app.theme);
    }
}

fn to_rect(bounds: BoundingBox) -> Rect {
    let clamp = |v: i32| v.clamp(0, i32::from(u16::MAX)) as u16;
    Rect::new(
        clamp(bounds.x),
        clamp(bounds.y),
        clamp(bounds.w),
        clamp(bounds.h),
    )
}

#[cfg(test)]
mod tests {
    use dashgrid_core::config::{
        ComponentConfig, ComponentId, Dashboard, DataConfig, LayoutNode, StyleConfig,
    };
    use dashgrid_core::fetch::{FetchResult, SourceOutput};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    use super::*;
    use crate::events::UiEvent;
    use crate::update::update;

    fn text(id: &str, title: &str) -> LayoutNode {
        LayoutNode::component(
            ComponentConfig::new("text", title)
                .with_id(id)
                .with_data(DataConfig::script("true")),
        )
    }

    fn draw(app: &AppState, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    fn app(layout: LayoutNode, width: u16, height: u16) -> AppState {
        let mut app = AppState::new(Dashboard::new(layout, StyleConfig::default()).unwrap());
        update(&mut app, UiEvent::Frame { width, height });
        app
    }

    #[test]
    fn test_panels_fill_their_boxes() {
        let layout = LayoutNode::row(vec![text("cpu", "CPU"), text("mem", "Memory")]);
        let mut app = app(layout, 40, 6);
        update(
            &mut app,
            UiEvent::FetchCompleted(FetchResult::text(
                ComponentId::new("mem"),
                SourceOutput::ok("42%"),
            )),
        );

        let terminal = draw(&app, 40, 6);
        let top = row(&terminal, 0);
        assert!(top.contains("CPU"));
        assert!(top.contains("Memory"));
        assert!(row(&terminal, 1).contains("42%"));
        assert!(row(&terminal, 1).contains("[loading...]"));
    }

    #[test]
    fn test_focused_border_is_highlighted() {
        let layout = LayoutNode::row(vec![text("a", "A"), text("b", "B")]);
        let app = app(layout, 20, 4);
        let terminal = draw(&app, 20, 4);
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 0)].fg, Color::Yellow);
        assert_eq!(buffer[(10, 0)].fg, Color::Gray);
    }

    #[test]
    fn test_stale_boxes_are_clipped() {
        let layout = LayoutNode::row(vec![text("a", "A"), text("b", "B")]);
        let app = app(layout, 80, 10);
        // Terminal shrank before the next Frame event.
        let terminal = draw(&app, 30, 5);
        assert!(row(&terminal, 0).contains('A'));
    }

    #[test]
    fn test_negative_boxes_clamp() {
        let rect = to_rect(BoundingBox::new(-3, 2, 5, -1));
        assert_eq!(rect, Rect::new(0, 2, 5, 0));
    }
}
