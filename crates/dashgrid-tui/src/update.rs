//! Dashboard reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use dashgrid_core::config::ComponentId;
use dashgrid_core::navigation::NavDirection;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;

/// Startup effects: one fetch per panel plus the first refresh timer of
/// every refreshing panel.
pub fn init(app: &AppState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for id in &app.order {
        let Some(panel) = app.panels.get(id) else {
            continue;
        };
        effects.extend(panel.init());
        if let Some(interval) = panel.refresh_interval() {
            effects.push(UiEffect::ScheduleRefresh {
                component_id: id.clone(),
                interval,
            });
        }
    }
    effects
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => vec![],
        UiEvent::Frame { width, height } => {
            if width != app.width || height != app.height {
                app.resize(width, height);
            }
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, &event),
        UiEvent::FetchCompleted(result) => {
            match app.panels.get_mut(&result.component_id) {
                Some(panel) => panel.set_content(result),
                None => tracing::debug!(id = %result.component_id, "Result for unknown component"),
            }
            vec![]
        }
        UiEvent::RefreshDue { component_id } => handle_refresh_due(app, &component_id),
        UiEvent::TodosPersisted {
            component_id,
            result,
        } => {
            if let Some(panel) = app.panels.get_mut(&component_id) {
                panel.todos_persisted(result);
            }
            vec![]
        }
    }
}

/// Re-fetches and re-arms the timer. Timers are never cancelled.
fn handle_refresh_due(app: &AppState, component_id: &ComponentId) -> Vec<UiEffect> {
    let Some(panel) = app.panels.get(component_id) else {
        return vec![];
    };
    let mut effects: Vec<UiEffect> = panel.fetch_effect().into_iter().collect();
    if let Some(interval) = panel.refresh_interval() {
        effects.push(UiEffect::ScheduleRefresh {
            component_id: component_id.clone(),
            interval,
        });
    }
    effects
}

fn handle_terminal_event(app: &mut AppState, event: &Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, *key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Resize(width, height) => {
            app.resize(*width, *height);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return vec![UiEffect::Quit];
    }

    if app.is_adding() {
        let Some(panel) = app.focused_panel_mut() else {
            return vec![];
        };
        let (_, effect) = panel.handle_add_mode(key);
        return effect.into_iter().collect();
    }

    if let Some(direction) = nav_direction(&key) {
        move_focus(app, direction);
        return vec![];
    }

    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let Some(panel) = app.focused_panel_mut() else {
        return vec![];
    };
    match key.code {
        KeyCode::Char('a' | 'A') if plain && panel.supports_add() => {
            panel.begin_add();
            vec![]
        }
        KeyCode::Char('r' | 'R') if plain => {
            if panel.supports_refresh() {
                tracing::debug!(id = %panel.id(), "Manual refresh");
                panel.fetch_effect().into_iter().collect()
            } else {
                vec![]
            }
        }
        _ => panel.update(&Event::Key(key)).into_iter().collect(),
    }
}

/// Global focus keys: shifted arrows and `H`/`J`/`K`/`L`.
fn nav_direction(key: &KeyEvent) -> Option<NavDirection> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Up if shifted => Some(NavDirection::Up),
        KeyCode::Down if shifted => Some(NavDirection::Down),
        KeyCode::Left if shifted => Some(NavDirection::Left),
        KeyCode::Right if shifted => Some(NavDirection::Right),
        KeyCode::Char('K') => Some(NavDirection::Up),
        KeyCode::Char('J') => Some(NavDirection::Down),
        KeyCode::Char('H') => Some(NavDirection::Left),
        KeyCode::Char('L') => Some(NavDirection::Right),
        _ => None,
    }
}

/// Moves focus to the neighbor in `direction` if it exists and can take focus.
fn move_focus(app: &mut AppState, direction: NavDirection) {
    let Some(current) = &app.focus else {
        return;
    };
    let Some(target) = app.nav.get(current).and_then(|entry| entry.get(direction)) else {
        return;
    };
    if app.is_focusable(target) {
        app.focus = Some(target.clone());
    }
}

fn handle_mouse(app: &mut AppState, mouse: &MouseEvent) -> Vec<UiEffect> {
    if app.is_adding() {
        return vec![];
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(id) = app.component_at(mouse.column, mouse.row)
            && app.is_focusable(id)
        {
            app.focus = Some(id.clone());
        }
        return vec![];
    }
    let Some(panel) = app.focused_panel_mut() else {
        return vec![];
    };
    panel.update(&Event::Mouse(*mouse)).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dashgrid_core::config::{ComponentConfig, Dashboard, DataConfig, LayoutNode, StyleConfig};
    use dashgrid_core::fetch::{FetchOutput, FetchRequest, FetchResult, SourceOutput};
    use dashgrid_core::todo::TodoItem;

    use super::*;
    use crate::components::PanelBody;

    fn text(id: &str, refresh: u64) -> LayoutNode {
        let mut data = DataConfig::script(format!("echo {id}"));
        data.refresh_interval = refresh;
        LayoutNode::component(ComponentConfig::new("text", id).with_id(id).with_data(data))
    }

    fn todo(id: &str) -> LayoutNode {
        let data = DataConfig {
            source: format!("{id}.txt"),
            ..DataConfig::default()
        };
        LayoutNode::component(ComponentConfig::new("todo", id).with_id(id).with_data(data))
    }

    fn broken(id: &str) -> LayoutNode {
        LayoutNode::component(ComponentConfig::new("gauge", id).with_id(id))
    }

    /// `a | b` on top, `c` spanning the bottom row.
    fn app(top_right: LayoutNode, bottom: LayoutNode) -> AppState {
        let layout = LayoutNode::column(vec![
            LayoutNode::row(vec![text("a", 0), top_right]),
            bottom,
        ]);
        let mut app = AppState::new(Dashboard::new(layout, StyleConfig::default()).unwrap());
        update(
            &mut app,
            UiEvent::Frame {
                width: 100,
                height: 40,
            },
        );
        app
    }

    fn press(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))),
        )
    }

    fn focus(app: &AppState) -> &str {
        app.focus.as_ref().map_or("", ComponentId::as_str)
    }

    fn click(app: &mut AppState, column: u16, row: u16) {
        update(
            app,
            UiEvent::Terminal(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })),
        );
    }

    #[test]
    fn test_init_fetches_everything_and_schedules_refreshers() {
        let app = app(text("b", 10), broken("c"));
        let effects = init(&app);
        let fetched: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                UiEffect::Fetch { component_id, .. } => Some(component_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fetched, ["a", "b"]);
        assert!(effects.contains(&UiEffect::ScheduleRefresh {
            component_id: ComponentId::new("b"),
            interval: Duration::from_secs(10),
        }));
        assert_eq!(effects.len(), 3);
    }

    #[test]
    fn test_initial_focus_is_first_focusable() {
        let layout = LayoutNode::row(vec![broken("x"), text("y", 0)]);
        let app = AppState::new(Dashboard::new(layout, StyleConfig::default()).unwrap());
        assert_eq!(focus(&app), "y");
    }

    #[test]
    fn test_navigation_keys_move_focus() {
        let mut app = app(text("b", 0), text("c", 0));
        assert_eq!(focus(&app), "a");
        press(&mut app, KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "b");
        press(&mut app, KeyCode::Char('J'), KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "c");
        press(&mut app, KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "a");
        // Nothing to the left of `a`.
        press(&mut app, KeyCode::Char('H'), KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "a");
    }

    #[test]
    fn test_focus_skips_unfocusable_neighbor() {
        let mut app = app(text("b", 0), broken("c"));
        press(&mut app, KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "a");
    }

    #[test]
    fn test_plain_arrows_stay_in_panel() {
        let mut app = app(text("b", 0), text("c", 0));
        press(&mut app, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(focus(&app), "a");
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app(text("b", 0), text("c", 0));
        let effects = press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(effects, vec![UiEffect::Quit]);
        assert!(app.should_quit);
    }

    #[test]
    fn test_manual_refresh_only_for_refreshing_panels() {
        let mut app = app(text("b", 30), text("c", 0));
        assert!(press(&mut app, KeyCode::Char('r'), KeyModifiers::NONE).is_empty());
        press(&mut app, KeyCode::Char('L'), KeyModifiers::SHIFT);
        let effects = press(&mut app, KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(
            effects,
            vec![UiEffect::Fetch {
                component_id: ComponentId::new("b"),
                request: FetchRequest::Script {
                    command: "echo b".to_string()
                },
            }]
        );
    }

    #[test]
    fn test_refresh_due_refetches_and_reschedules() {
        let mut app = app(text("b", 2), text("c", 0));
        let effects = update(
            &mut app,
            UiEvent::RefreshDue {
                component_id: ComponentId::new("b"),
            },
        );
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], UiEffect::Fetch { .. }));
        assert!(matches!(
            effects[1],
            UiEffect::ScheduleRefresh { interval, .. } if interval == Duration::from_secs(2)
        ));
    }

    #[test]
    fn test_fetch_result_routed_by_id() {
        let mut app = app(text("b", 0), text("c", 0));
        update(
            &mut app,
            UiEvent::FetchCompleted(FetchResult::text(
                ComponentId::new("c"),
                SourceOutput::ok("hello"),
            )),
        );
        let PanelBody::Text(c) = app.panels[&ComponentId::new("c")].body() else {
            panic!("expected text panel");
        };
        assert_eq!(c.display_text(), "hello");
        let PanelBody::Text(a) = app.panels[&ComponentId::new("a")].body() else {
            panic!("expected text panel");
        };
        assert_eq!(a.display_text(), crate::components::LOADING);
    }

    #[test]
    fn test_add_mode_captures_keys_until_enter() {
        let mut app = app(todo("t"), text("c", 0));
        press(&mut app, KeyCode::Char('L'), KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "t");
        update(
            &mut app,
            UiEvent::FetchCompleted(FetchResult {
                component_id: ComponentId::new("t"),
                output: FetchOutput::Todos(vec![TodoItem::new("old", true)]),
                error: None,
            }),
        );

        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(app.is_adding());
        // Navigation keys are text while adding.
        press(&mut app, KeyCode::Char('H'), KeyModifiers::SHIFT);
        press(&mut app, KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(focus(&app), "t");

        let effects = press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(!app.is_adding());
        assert_eq!(
            effects,
            vec![UiEffect::PersistTodos {
                component_id: ComponentId::new("t"),
                path: "t.txt".into(),
                items: vec![TodoItem::new("old", true), TodoItem::new("Hi", false)],
            }]
        );
    }

    #[test]
    fn test_unreadable_todo_file_is_never_rewritten() {
        let mut app = app(todo("t"), text("c", 0));
        press(&mut app, KeyCode::Char('L'), KeyModifiers::SHIFT);
        assert_eq!(focus(&app), "t");
        update(
            &mut app,
            UiEvent::FetchCompleted(FetchResult {
                component_id: ComponentId::new("t"),
                output: FetchOutput::Todos(Vec::new()),
                error: Some("Failed to read todo file: t.txt".to_string()),
            }),
        );

        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(!app.is_adding());
        let effects = [
            press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE),
            press(&mut app, KeyCode::Enter, KeyModifiers::NONE),
            press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE),
            press(&mut app, KeyCode::Delete, KeyModifiers::NONE),
        ];
        assert!(effects.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_add_key_ignored_without_support() {
        let mut app = app(text("b", 0), text("c", 0));
        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(!app.is_adding());
    }

    #[test]
    fn test_click_focuses_panel() {
        let mut app = app(text("b", 0), broken("c"));
        click(&mut app, 75, 5);
        assert_eq!(focus(&app), "b");
        // Error panels never take focus.
        click(&mut app, 10, 30);
        assert_eq!(focus(&app), "b");
    }

    #[test]
    fn test_resize_recomputes_boxes() {
        let mut app = app(text("b", 0), text("c", 0));
        assert_eq!(app.boxes[&ComponentId::new("b")].w, 50);
        update(
            &mut app,
            UiEvent::Frame {
                width: 61,
                height: 20,
            },
        );
        assert_eq!(app.boxes[&ComponentId::new("a")].w, 30);
        assert_eq!(app.boxes[&ComponentId::new("b")].w, 31);
        assert_eq!(app.boxes[&ComponentId::new("c")].y, 10);
    }

    #[test]
    fn test_resize_to_nothing_drops_focus() {
        let mut app = app(text("b", 0), text("c", 0));
        press(&mut app, KeyCode::Char('L'), KeyModifiers::SHIFT);
        update(
            &mut app,
            UiEvent::Frame {
                width: 0,
                height: 0,
            },
        );
        assert!(app.boxes.is_empty());
        assert_eq!(focus(&app), "a");
    }
}
