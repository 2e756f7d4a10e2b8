//! Dashboard state owned by the event loop.

use std::collections::BTreeMap;

use dashgrid_core::config::{ComponentId, Dashboard};
use dashgrid_core::layout::{BoxMap, compute_boxes};
use dashgrid_core::navigation::{NavGraph, build_nav};

use crate::components::Panel;
use crate::theme::Theme;

pub struct AppState {
    pub should_quit: bool,
    pub dashboard: Dashboard,
    /// One panel per leaf component.
    pub panels: BTreeMap<ComponentId, Panel>,
    /// Component ids in depth-first layout order.
    pub order: Vec<ComponentId>,
    /// Boxes and neighbors for the current terminal size.
    pub boxes: BoxMap,
    pub nav: NavGraph,
    pub focus: Option<ComponentId>,
    pub width: u16,
    pub height: u16,
    pub theme: Theme,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let mut panels = BTreeMap::new();
        let mut order = Vec::new();
        for component in dashboard.components() {
            order.push(component.id.clone());
            panels.insert(component.id.clone(), Panel::from_config(component));
        }
        let theme = Theme::from_config(&dashboard.style);

        let mut state = Self {
            should_quit: false,
            dashboard,
            panels,
            order,
            boxes: BoxMap::new(),
            nav: NavGraph::new(),
            focus: None,
            width: 0,
            height: 0,
            theme,
        };
        state.focus = state.first_focusable();
        state
    }

    /// First focusable component in layout order.
    pub fn first_focusable(&self) -> Option<ComponentId> {
        self.order
            .iter()
            .find(|id| self.panels.get(*id).is_some_and(Panel::is_focusable))
            .cloned()
    }

    pub fn is_focusable(&self, id: &ComponentId) -> bool {
        self.panels.get(id).is_some_and(Panel::is_focusable)
    }

    pub fn focused_panel(&self) -> Option<&Panel> {
        self.panels.get(self.focus.as_ref()?)
    }

    pub fn focused_panel_mut(&mut self) -> Option<&mut Panel> {
        self.panels.get_mut(self.focus.as_ref()?)
    }

    /// Whether the focused panel is collecting add-mode input.
    pub fn is_adding(&self) -> bool {
        self.focused_panel().is_some_and(Panel::is_adding)
    }

    /// Recomputes boxes and neighbors for a new terminal size.
    ///
    /// Focus falls back to the first focusable component when the focused
    /// one no longer has a box.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.boxes = compute_boxes(
            &self.dashboard.layout,
            0,
            0,
            i32::from(width),
            i32::from(height),
        );
        self.nav = build_nav(&self.boxes);

        let focus_visible = self
            .focus
            .as_ref()
            .is_some_and(|id| self.boxes.contains_key(id));
        if !focus_visible {
            self.focus = self.first_focusable();
        }
    }

    /// Component under the terminal cell `(column, row)`.
    ///
    /// Boxes never overlap; if they did, the smallest id would win.
    pub fn component_at(&self, column: u16, row: u16) -> Option<&ComponentId> {
        self.boxes
            .iter()
            .find(|(_, bounds)| bounds.contains(i32::from(column), i32::from(row)))
            .map(|(id, _)| id)
    }
}
