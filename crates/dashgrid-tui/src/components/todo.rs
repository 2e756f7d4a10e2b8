//! Todo panel: an editable checklist backed by a flat file.
//!
//! Every mutation returns the full item list so the caller can persist it;
//! the panel itself never writes the file. Until the file has loaded
//! cleanly the panel is read-only, so a rewrite can never drop items it
//! has not seen.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dashgrid_core::fetch::{FetchOutput, FetchResult};
use dashgrid_core::todo::TodoItem;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{List, ListItem, ListState};

use super::{LOADING, render_placeholder, render_status};
use crate::common::{Selection, scroll_action};
use crate::theme::Theme;

/// Outcome of one add-mode keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Add mode is over.
    pub exit: bool,
    /// Items to persist, if the keystroke committed a new entry.
    pub persist: Option<Vec<TodoItem>>,
}

impl AddOutcome {
    fn stay() -> Self {
        Self {
            exit: false,
            persist: None,
        }
    }

    fn exit(persist: Option<Vec<TodoItem>>) -> Self {
        Self {
            exit: true,
            persist,
        }
    }
}

#[derive(Debug, Default)]
pub struct TodoPanel {
    items: Vec<TodoItem>,
    loaded: bool,
    selection: Selection,
    draft: Option<String>,
    load_error: Option<String>,
    write_error: Option<String>,
}

impl TodoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selection.selected()
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn write_error(&self) -> Option<&str> {
        self.write_error.as_deref()
    }

    /// Whether the in-memory list mirrors the file.
    pub fn is_editable(&self) -> bool {
        self.loaded && self.load_error.is_none()
    }

    pub fn set_content(&mut self, result: FetchResult) {
        self.loaded = true;
        self.load_error = result.error;
        self.items = match result.output {
            FetchOutput::Todos(items) => items,
            FetchOutput::Text(_) => Vec::new(),
        };
        self.selection.clamp(self.items.len());
    }

    /// Handles a key while not in add mode.
    pub fn update(&mut self, event: &Event) -> Option<Vec<TodoItem>> {
        if let Event::Key(key) = event
            && self.is_editable()
            && key.kind != KeyEventKind::Release
            && !key.modifiers.contains(KeyModifiers::CONTROL)
        {
            match key.code {
                KeyCode::Char(' ') => return self.toggle_selected(),
                KeyCode::Char('d' | 'D') | KeyCode::Delete | KeyCode::Backspace => {
                    return self.delete_selected();
                }
                _ => {}
            }
        }
        if let Some(action) = scroll_action(event) {
            self.selection.apply(action, self.items.len());
        }
        None
    }

    fn toggle_selected(&mut self) -> Option<Vec<TodoItem>> {
        let item = self.items.get_mut(self.selection.selected())?;
        item.done = !item.done;
        Some(self.items.clone())
    }

    fn delete_selected(&mut self) -> Option<Vec<TodoItem>> {
        let index = self.selection.selected();
        if index >= self.items.len() {
            return None;
        }
        self.items.remove(index);
        self.selection.select(index.saturating_sub(1), self.items.len());
        Some(self.items.clone())
    }

    /// Enters add mode with an empty draft. Returns false while the list
    /// is not editable.
    pub fn begin_add(&mut self) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.draft = Some(String::new());
        true
    }

    /// Handles a key while in add mode.
    ///
    /// Escape discards the draft. Enter appends a non-empty draft and exits
    /// either way. Backspace edits, printable characters append.
    pub fn handle_add_key(&mut self, key: KeyEvent) -> AddOutcome {
        let Some(draft) = self.draft.as_mut() else {
            return AddOutcome::exit(None);
        };
        if key.kind == KeyEventKind::Release {
            return AddOutcome::stay();
        }

        match key.code {
            KeyCode::Esc => {
                self.draft = None;
                AddOutcome::exit(None)
            }
            KeyCode::Enter => {
                let title = draft.trim().to_string();
                self.draft = None;
                if title.is_empty() {
                    return AddOutcome::exit(None);
                }
                self.items.push(TodoItem::new(title, false));
                self.selection.select(self.items.len() - 1, self.items.len());
                AddOutcome::exit(Some(self.items.clone()))
            }
            KeyCode::Backspace => {
                draft.pop();
                AddOutcome::stay()
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                draft.push(c);
                AddOutcome::stay()
            }
            _ => AddOutcome::stay(),
        }
    }

    /// Records the outcome of the last file rewrite.
    pub fn persisted(&mut self, result: Result<(), String>) {
        self.write_error = result.err();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if let Some(draft) = &self.draft {
            render_placeholder(frame, area, &format!("New ToDo: {draft}_"), theme.highlight);
            return;
        }
        if !self.loaded {
            render_placeholder(frame, area, LOADING, theme.muted);
            return;
        }
        if self.items.is_empty() {
            let message = match &self.load_error {
                Some(error) => format!("[Error: {error}]"),
                None => "[No items, press 'a' to add]".to_string(),
            };
            render_placeholder(frame, area, &message, theme.muted);
            return;
        }

        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        self.selection.set_page_rows(body.height as usize);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let mark = if item.done { "[x]" } else { "[ ]" };
                let style = if item.done { theme.muted } else { theme.text };
                ListItem::new(format!("{mark} {}", item.title)).style(style)
            })
            .collect();
        let highlight = if focused {
            theme.highlight
        } else {
            theme.text
        };
        let list = List::new(items)
            .highlight_style(highlight)
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.selection.selected()));
        frame.render_stateful_widget(list, body, &mut state);

        let done = self.items.iter().filter(|item| item.done).count();
        let summary = format!("{done}/{} done", self.items.len());
        render_status(frame, status, None, &summary, theme);
    }
}

#[cfg(test)]
mod tests {
    use dashgrid_core::config::ComponentId;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(items: &[(&str, bool)]) -> TodoPanel {
        let mut panel = TodoPanel::new();
        panel.set_content(FetchResult::todos(
            ComponentId::new("todo"),
            items
                .iter()
                .map(|(title, done)| TodoItem::new(*title, *done))
                .collect(),
        ));
        panel
    }

    fn type_text(panel: &mut TodoPanel, text: &str) {
        for c in text.chars() {
            assert_eq!(panel.handle_add_key(key(KeyCode::Char(c))), AddOutcome::stay());
        }
    }

    #[test]
    fn test_space_toggles_selected() {
        let mut panel = loaded(&[("a", false), ("b", false)]);
        let persisted = panel.update(&Event::Key(key(KeyCode::Char(' ')))).unwrap();
        assert_eq!(persisted[0], TodoItem::new("a", true));
        assert!(panel.items()[0].done);
    }

    #[test]
    fn test_delete_moves_selection_up() {
        let mut panel = loaded(&[("a", false), ("b", false), ("c", true)]);
        panel.update(&Event::Key(key(KeyCode::Down)));
        panel.update(&Event::Key(key(KeyCode::Down)));
        let persisted = panel.update(&Event::Key(key(KeyCode::Char('d')))).unwrap();
        assert_eq!(
            persisted,
            vec![TodoItem::new("a", false), TodoItem::new("b", false)]
        );
        assert_eq!(panel.selected(), 1);
    }

    #[test]
    fn test_delete_on_empty_list_is_noop() {
        let mut panel = loaded(&[]);
        assert_eq!(panel.update(&Event::Key(key(KeyCode::Delete))), None);
    }

    #[test]
    fn test_add_mode_commits_on_enter() {
        let mut panel = loaded(&[("a", false)]);
        panel.begin_add();
        type_text(&mut panel, "buy milkk");
        panel.handle_add_key(key(KeyCode::Backspace));
        assert_eq!(panel.draft(), Some("buy milk"));

        let outcome = panel.handle_add_key(key(KeyCode::Enter));
        assert!(outcome.exit);
        assert_eq!(
            outcome.persist.unwrap(),
            vec![TodoItem::new("a", false), TodoItem::new("buy milk", false)]
        );
        assert_eq!(panel.draft(), None);
        assert_eq!(panel.selected(), 1);
    }

    #[test]
    fn test_add_mode_escape_discards() {
        let mut panel = loaded(&[]);
        panel.begin_add();
        type_text(&mut panel, "nope");
        assert_eq!(panel.handle_add_key(key(KeyCode::Esc)), AddOutcome::exit(None));
        assert!(panel.items().is_empty());
        assert_eq!(panel.draft(), None);
    }

    #[test]
    fn test_add_mode_empty_enter_exits_without_commit() {
        let mut panel = loaded(&[]);
        panel.begin_add();
        type_text(&mut panel, "  ");
        assert_eq!(panel.handle_add_key(key(KeyCode::Enter)), AddOutcome::exit(None));
        assert!(panel.items().is_empty());
    }

    #[test]
    fn test_add_mode_ignores_control_chords() {
        let mut panel = loaded(&[]);
        panel.begin_add();
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(panel.handle_add_key(ctrl_x), AddOutcome::stay());
        assert_eq!(panel.draft(), Some(""));
    }

    #[test]
    fn test_write_error_is_recorded_and_cleared() {
        let mut panel = loaded(&[]);
        panel.persisted(Err("permission denied".to_string()));
        assert_eq!(panel.write_error(), Some("permission denied"));
        panel.persisted(Ok(()));
        assert_eq!(panel.write_error(), None);
    }

    #[test]
    fn test_load_error_makes_panel_read_only() {
        let mut panel = TodoPanel::new();
        panel.set_content(FetchResult {
            component_id: ComponentId::new("todo"),
            output: FetchOutput::Todos(Vec::new()),
            error: Some("Failed to read todo file: todo.txt".to_string()),
        });
        assert!(!panel.is_editable());
        assert!(!panel.begin_add());
        assert_eq!(panel.draft(), None);
        assert_eq!(panel.update(&Event::Key(key(KeyCode::Char(' ')))), None);
        assert_eq!(panel.update(&Event::Key(key(KeyCode::Char('d')))), None);
    }

    #[test]
    fn test_mutations_wait_for_first_load() {
        let mut panel = TodoPanel::new();
        assert!(!panel.begin_add());
        assert_eq!(panel.update(&Event::Key(key(KeyCode::Delete))), None);

        panel.set_content(FetchResult::todos(ComponentId::new("todo"), Vec::new()));
        assert!(panel.begin_add());
        type_text(&mut panel, "first");
        let outcome = panel.handle_add_key(key(KeyCode::Enter));
        assert_eq!(outcome.persist.unwrap(), vec![TodoItem::new("first", false)]);
    }
}
