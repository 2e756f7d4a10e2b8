//! Panel variants and the uniform contract the reducer drives them through.
//!
//! Each leaf component of the layout owns exactly one [`Panel`]. Panels never
//! perform I/O: anything with a side effect (fetching, persisting todos) is
//! returned as a [`UiEffect`] for the runtime to execute.

pub mod chart;
pub mod error;
pub mod histogram;
pub mod list;
pub mod table;
pub mod text;
pub mod todo;

use std::time::Duration;

use crossterm::event::{Event, KeyEvent};
use dashgrid_core::config::{ComponentConfig, ComponentId};
use dashgrid_core::fetch::{FetchRequest, FetchResult};
use dashgrid_core::todo::TodoItem;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

pub use self::chart::ChartPanel;
pub use self::error::ErrorPanel;
pub use self::histogram::HistogramPanel;
pub use self::list::ListPanel;
pub use self::table::TablePanel;
pub use self::text::TextPanel;
pub use self::todo::TodoPanel;
use crate::common::text::{truncate_with_ellipsis, wrap_lines};
use crate::common::{ScrollViewport, Scrollbar};
use crate::effects::UiEffect;
use crate::theme::Theme;

pub const LOADING: &str = "[loading...]";
pub const NO_DATA: &str = "[Loading or No Data]";
pub const TOO_SMALL: &str = "[Area Too Small]";

const UNTITLED: &str = "Untitled";
const KNOWN_KINDS: [&str; 6] = ["text", "list", "todo", "table", "chart", "histogram"];

/// Variant-specific panel state.
#[derive(Debug)]
pub enum PanelBody {
    Text(TextPanel),
    List(ListPanel),
    Todo(TodoPanel),
    Table(TablePanel),
    Chart(ChartPanel),
    Histogram(HistogramPanel),
    Error(ErrorPanel),
}

/// Runtime state of one leaf component.
#[derive(Debug)]
pub struct Panel {
    config: ComponentConfig,
    request: Option<FetchRequest>,
    body: PanelBody,
}

impl Panel {
    /// Builds the panel for a component declaration.
    ///
    /// Declarations that cannot be served (unknown type, no data source,
    /// a table without columns) become an [`ErrorPanel`].
    pub fn from_config(config: &ComponentConfig) -> Self {
        let body = build_body(config).unwrap_or_else(|message| {
            tracing::warn!(id = %config.id, kind = %config.kind, "{message}");
            PanelBody::Error(ErrorPanel::new(message, &config.kind, config.id.clone()))
        });
        let request = match body {
            PanelBody::Error(_) => None,
            _ => FetchRequest::for_component(config),
        };
        Self {
            config: config.clone(),
            request,
            body,
        }
    }

    pub fn id(&self) -> &ComponentId {
        &self.config.id
    }

    pub fn kind(&self) -> &str {
        &self.config.kind
    }

    pub fn body(&self) -> &PanelBody {
        &self.body
    }

    pub fn is_focusable(&self) -> bool {
        !matches!(self.body, PanelBody::Error(_))
    }

    pub fn supports_add(&self) -> bool {
        matches!(self.body, PanelBody::Todo(_))
    }

    pub fn supports_refresh(&self) -> bool {
        self.refresh_interval().is_some()
    }

    /// Scheduled refresh period, if the panel refreshes at all.
    pub fn refresh_interval(&self) -> Option<Duration> {
        let secs = self.config.refresh_interval();
        (secs > 0 && self.request.is_some()).then(|| Duration::from_secs(secs))
    }

    /// Effect that loads this panel's data.
    pub fn fetch_effect(&self) -> Option<UiEffect> {
        self.request.clone().map(|request| UiEffect::Fetch {
            component_id: self.config.id.clone(),
            request,
        })
    }

    /// One-time startup effect.
    pub fn init(&self) -> Option<UiEffect> {
        self.fetch_effect()
    }

    /// Handles focused input outside add mode.
    pub fn update(&mut self, event: &Event) -> Option<UiEffect> {
        let persist = match &mut self.body {
            PanelBody::Text(panel) => {
                panel.update(event);
                None
            }
            PanelBody::List(panel) => {
                panel.update(event);
                None
            }
            PanelBody::Table(panel) => {
                panel.update(event);
                None
            }
            PanelBody::Histogram(panel) => {
                panel.update(event);
                None
            }
            PanelBody::Todo(panel) => panel.update(event),
            PanelBody::Chart(_) | PanelBody::Error(_) => None,
        };
        persist.and_then(|items| self.persist_effect(items))
    }

    pub fn set_content(&mut self, result: FetchResult) {
        match &mut self.body {
            PanelBody::Text(panel) => panel.set_content(&result),
            PanelBody::List(panel) => panel.set_content(&result),
            PanelBody::Table(panel) => panel.set_content(&result),
            PanelBody::Chart(panel) => panel.set_content(&result),
            PanelBody::Histogram(panel) => panel.set_content(&result),
            PanelBody::Todo(panel) => panel.set_content(result),
            PanelBody::Error(_) => {}
        }
    }

    /// Enters add mode. Returns false for panels without add support or
    /// whose data is not editable yet.
    pub fn begin_add(&mut self) -> bool {
        match &mut self.body {
            PanelBody::Todo(panel) => panel.begin_add(),
            _ => false,
        }
    }

    pub fn is_adding(&self) -> bool {
        matches!(&self.body, PanelBody::Todo(panel) if panel.draft().is_some())
    }

    /// Handles a key in add mode. Returns whether add mode is over.
    pub fn handle_add_mode(&mut self, key: KeyEvent) -> (bool, Option<UiEffect>) {
        let PanelBody::Todo(panel) = &mut self.body else {
            return (true, None);
        };
        let outcome = panel.handle_add_key(key);
        let effect = outcome
            .persist
            .and_then(|items| self.persist_effect(items));
        (outcome.exit, effect)
    }

    pub fn todos_persisted(&mut self, result: Result<(), String>) {
        if let PanelBody::Todo(panel) = &mut self.body {
            panel.persisted(result);
        }
    }

    fn persist_effect(&self, items: Vec<TodoItem>) -> Option<UiEffect> {
        match &self.request {
            Some(FetchRequest::TodoFile { path }) => Some(UiEffect::PersistTodos {
                component_id: self.config.id.clone(),
                path: path.clone(),
                items,
            }),
            _ => None,
        }
    }

    fn title(&self, max_width: usize) -> String {
        let mut title = if self.config.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            self.config.title.clone()
        };
        if let PanelBody::Todo(panel) = &self.body
            && let Some(error) = panel.write_error()
        {
            title = format!("{title} [write failed: {error}]");
        }
        format!(" {} ", truncate_with_ellipsis(&title, max_width))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if area.is_empty() {
            return;
        }
        let border_style = match &self.body {
            PanelBody::Error(_) => theme.error_border,
            _ if focused => theme.focused_border,
            _ => theme.border,
        };
        let block = Block::bordered()
            .border_type(theme.border_type)
            .border_style(border_style)
            .title(self.title(area.width.saturating_sub(4) as usize));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.is_empty() {
            return;
        }

        match &self.body {
            PanelBody::Text(panel) => panel.render(frame, inner, theme),
            PanelBody::List(panel) => panel.render(frame, inner, focused, theme),
            PanelBody::Todo(panel) => panel.render(frame, inner, focused, theme),
            PanelBody::Table(panel) => panel.render(frame, inner, focused, theme),
            PanelBody::Chart(panel) => panel.render(frame, inner, theme),
            PanelBody::Histogram(panel) => panel.render(frame, inner, theme),
            PanelBody::Error(panel) => panel.render(frame, inner, theme),
        }
    }
}

fn build_body(config: &ComponentConfig) -> Result<PanelBody, String> {
    let kind = config.kind.as_str();
    if !KNOWN_KINDS.contains(&kind) {
        return Err(format!("unknown component type: {kind}"));
    }
    let data = config
        .data
        .as_ref()
        .ok_or_else(|| "missing data configuration".to_string())?;
    let caption = data.caption().map(str::to_string);

    Ok(match kind {
        "text" => PanelBody::Text(TextPanel::new(caption)),
        "list" => PanelBody::List(ListPanel::new(data.source_kind(), caption)),
        "todo" => {
            if data.source.trim().is_empty() {
                return Err("todo component requires a file path as its source".to_string());
            }
            PanelBody::Todo(TodoPanel::new())
        }
        "table" => {
            if data.columns.is_empty() {
                return Err("table component requires column definitions".to_string());
            }
            PanelBody::Table(TablePanel::new(data.columns.clone(), caption))
        }
        "chart" => PanelBody::Chart(ChartPanel::new(data.refresh_mode, caption)),
        "histogram" => PanelBody::Histogram(HistogramPanel::new(caption)),
        other => return Err(format!("unknown component type: {other}")),
    })
}

/// Message shown when a fetch or parse failed.
pub(crate) fn error_text(error: &str) -> String {
    format!("[Error fetching/parsing data]\n{error}")
}

/// Draws `text` wrapped and centered in `area`.
pub(crate) fn render_placeholder(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    if area.is_empty() {
        return;
    }
    let lines: Vec<Line> = wrap_lines(text, area.width as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    let top = (area.height as usize).saturating_sub(lines.len()) / 2;
    let area = Rect {
        y: area.y + top as u16,
        height: area.height - top as u16,
        ..area
    };
    frame.render_widget(
        Paragraph::new(lines)
            .style(style)
            .alignment(Alignment::Center),
        area,
    );
}

/// Draws a one-row status line: optional centered caption, right-aligned info.
pub(crate) fn render_status(
    frame: &mut Frame,
    area: Rect,
    caption: Option<&str>,
    info: &str,
    theme: &Theme,
) {
    let info_width = (info.width() as u16).min(area.width);
    let [caption_area, info_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(info_width)]).areas(area);
    if let Some(caption) = caption {
        let caption = truncate_with_ellipsis(caption, caption_area.width as usize);
        frame.render_widget(
            Paragraph::new(caption)
                .style(theme.text.add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            caption_area,
        );
    }
    frame.render_widget(
        Paragraph::new(info.to_string())
            .style(theme.muted)
            .alignment(Alignment::Right),
        info_area,
    );
}

/// Draws scrollable content produced by `build` for a given wrap width.
///
/// When everything fits, the caption is appended below the content. When it
/// overflows, one column is reserved for the scrollbar and a footer row shows
/// the caption and scroll position.
pub(crate) fn render_viewport(
    frame: &mut Frame,
    area: Rect,
    viewport: &ScrollViewport,
    caption: Option<&str>,
    theme: &Theme,
    build: impl Fn(usize) -> Vec<Line<'static>>,
) {
    if area.is_empty() {
        return;
    }
    let height = area.height as usize;

    let mut lines = build(area.width as usize);
    if let Some(caption) = caption {
        lines.push(Line::default());
        lines.push(
            Line::styled(caption.to_string(), theme.text.add_modifier(Modifier::BOLD))
                .centered(),
        );
    }
    if lines.len() <= height {
        viewport.set_metrics(lines.len(), height);
        frame.render_widget(Paragraph::new(lines).style(theme.text), area);
        return;
    }

    let [body, footer] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    let lines = build(body.width.saturating_sub(1) as usize);
    let visible = body.height as usize;
    viewport.set_metrics(lines.len(), visible);
    let offset = viewport.offset();
    let total = lines.len();

    let shown: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
    let text_area = Rect {
        width: body.width.saturating_sub(1),
        ..body
    };
    frame.render_widget(Paragraph::new(shown).style(theme.text), text_area);
    frame.render_widget(Scrollbar::new(total, visible, offset).style(theme.muted), body);

    let percent = format!("{:3.0}% ⥮ ", viewport.scroll_percent() * 100.0);
    render_status(frame, footer, caption, &percent, theme);
}
