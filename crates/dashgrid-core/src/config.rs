//! Dashboard configuration.
//!
//! Loads the dashboard document (layout tree + style) from JSON, or from TOML
//! when the file has a `.toml` extension. Loading also resolves component
//! identities so every map in the runtime can be keyed by [`ComponentId`].

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Default config file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Stable identity of a leaf component within one layout tree.
///
/// Explicit ids come from configuration. Components without one get a
/// synthesized `#<n>` id that is only valid for the current process run.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Split direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Children are laid out left to right.
    Row,
    /// Children are laid out top to bottom. Unknown values fall back here.
    #[default]
    #[serde(other)]
    Column,
}

/// A node of the layout tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    Container {
        #[serde(default)]
        direction: Direction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flex: Option<i32>,
        #[serde(default)]
        children: Vec<LayoutNode>,
    },
    Component {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flex: Option<i32>,
        component: ComponentConfig,
    },
}

impl LayoutNode {
    pub fn row(children: Vec<LayoutNode>) -> Self {
        Self::Container {
            direction: Direction::Row,
            flex: None,
            children,
        }
    }

    pub fn column(children: Vec<LayoutNode>) -> Self {
        Self::Container {
            direction: Direction::Column,
            flex: None,
            children,
        }
    }

    pub fn component(component: ComponentConfig) -> Self {
        Self::Component {
            flex: None,
            component,
        }
    }

    #[must_use]
    pub fn with_flex(mut self, value: i32) -> Self {
        match &mut self {
            Self::Container { flex, .. } | Self::Component { flex, .. } => *flex = Some(value),
        }
        self
    }

    /// Weight of this node among its siblings. Unset or non-positive means 1.
    pub fn weight(&self) -> i32 {
        let flex = match self {
            Self::Container { flex, .. } | Self::Component { flex, .. } => *flex,
        };
        flex.filter(|f| *f > 0).unwrap_or(1)
    }

    /// Visits every leaf component in depth-first order.
    pub fn for_each_component<'a>(&'a self, f: &mut impl FnMut(&'a ComponentConfig)) {
        match self {
            Self::Component { component, .. } => f(component),
            Self::Container { children, .. } => {
                for child in children {
                    child.for_each_component(f);
                }
            }
        }
    }

    fn for_each_component_mut(&mut self, f: &mut impl FnMut(&mut ComponentConfig)) {
        match self {
            Self::Component { component, .. } => f(component),
            Self::Container { children, .. } => {
                for child in children {
                    child.for_each_component_mut(f);
                }
            }
        }
    }
}

/// A leaf component declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Identity declared in configuration, if any.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub declared_id: Option<String>,
    /// Resolved identity (declared or synthesized). Filled by [`Dashboard::new`].
    #[serde(skip)]
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataConfig>,
}

impl ComponentConfig {
    pub fn new(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.id = ComponentId::new(id.as_str());
        self.declared_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: DataConfig) -> Self {
        self.data = Some(data);
        self
    }

    /// Refresh interval in seconds, 0 when the component never refreshes.
    pub fn refresh_interval(&self) -> u64 {
        self.data.as_ref().map_or(0, |d| d.refresh_interval)
    }
}

/// How a refreshed payload combines with existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    Append,
    /// Unknown values fall back here.
    #[default]
    #[serde(other)]
    Replace,
}

/// Kind of data source named by `DataConfig::source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Script,
    Api,
    Other,
}

/// Data source descriptor of a component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// `script`, `api`, or (for todo components) the todo file path.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub refresh_mode: RefreshMode,
    /// Seconds between scheduled refreshes. 0 disables refreshing.
    #[serde(default)]
    pub refresh_interval: u64,
}

impl DataConfig {
    pub fn script(command: impl Into<String>) -> Self {
        Self {
            source: "script".to_string(),
            command: Some(command.into()),
            ..Self::default()
        }
    }

    pub fn api(url: impl Into<String>) -> Self {
        Self {
            source: "api".to_string(),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self.source.as_str() {
            "script" => SourceKind::Script,
            "api" => SourceKind::Api,
            _ => SourceKind::Other,
        }
    }

    /// Caption text, ignoring empty strings.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.is_empty())
    }
}

/// A table column declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default)]
    pub label: String,
    /// Object field looked up for this column. Positional rows ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<i32>,
}

impl ColumnConfig {
    pub fn weight(&self) -> i32 {
        self.flex.filter(|f| *f > 0).unwrap_or(1)
    }
}

/// Visual style settings. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub global: GlobalStyleConfig,
    pub border: BorderStyleConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalStyleConfig {
    pub text_color: Option<String>,
    pub highlighted_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderStyleConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
    pub focused_color: Option<String>,
}

/// Raw on-disk document.
#[derive(Debug, Deserialize)]
struct DashboardDocument {
    layout: Option<LayoutNode>,
    #[serde(default)]
    style: StyleConfig,
}

/// A loaded dashboard with resolved component identities.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub layout: LayoutNode,
    pub style: StyleConfig,
}

impl Dashboard {
    /// Builds a dashboard, resolving ids.
    ///
    /// # Errors
    /// Returns an error if two components declare the same id.
    pub fn new(mut layout: LayoutNode, style: StyleConfig) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut duplicate = None;
        let mut anonymous = 0usize;
        layout.for_each_component_mut(&mut |component| {
            let id = match component.declared_id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => ComponentId::new(id),
                None => {
                    anonymous += 1;
                    ComponentId::new(format!("#{anonymous}"))
                }
            };
            if !seen.insert(id.clone()) && duplicate.is_none() {
                duplicate = Some(id.clone());
            }
            component.id = id;
        });

        if let Some(id) = duplicate {
            bail!("Duplicate component id '{id}'");
        }

        Ok(Self { layout, style })
    }

    /// Loads the dashboard from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let result = if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        };
        result.with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parses a JSON dashboard document.
    ///
    /// # Errors
    /// Returns an error if the document is malformed.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let doc: DashboardDocument =
            serde_json::from_str(contents).context("Failed to parse JSON config")?;
        Self::from_document(doc)
    }

    /// Parses a TOML dashboard document.
    ///
    /// # Errors
    /// Returns an error if the document is malformed.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let doc: DashboardDocument =
            toml::from_str(contents).context("Failed to parse TOML config")?;
        Self::from_document(doc)
    }

    fn from_document(doc: DashboardDocument) -> Result<Self> {
        let Some(layout) = doc.layout else {
            bail!("Config has no layout");
        };
        Self::new(layout, doc.style)
    }

    /// Leaf components in depth-first order.
    pub fn components(&self) -> Vec<&ComponentConfig> {
        let mut out = Vec::new();
        self.layout.for_each_component(&mut |c| out.push(c));
        out
    }
}
