//! Data fetching for dashboard components.
//!
//! Every fetch is a one-shot async operation that never fails past its own
//! boundary: process, network and parse errors are carried inside the
//! returned [`FetchResult`].

mod api;
mod script;

use std::path::PathBuf;

pub use api::{API_TIMEOUT, run_api};
pub use script::run_script;

use crate::config::{ComponentConfig, ComponentId, SourceKind};
use crate::todo::{TodoItem, read_todo_file_async};

/// Raw outcome of a script or API call.
///
/// A failing script may still produce output; consumers check `error` first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOutput {
    pub output: String,
    pub error: Option<String>,
}

impl SourceOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: Some(error.into()),
        }
    }
}

/// What to fetch for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Script { command: String },
    Api { url: String, json_path: Option<String> },
    TodoFile { path: PathBuf },
    Invalid { reason: String },
}

impl FetchRequest {
    /// Derives the request from a component declaration.
    ///
    /// Returns `None` when the component has no data descriptor.
    pub fn for_component(component: &ComponentConfig) -> Option<Self> {
        let data = component.data.as_ref()?;
        if component.kind == "todo" {
            return Some(Self::TodoFile {
                path: PathBuf::from(&data.source),
            });
        }
        Some(match data.source_kind() {
            SourceKind::Script => Self::Script {
                command: data.command.clone().unwrap_or_default(),
            },
            SourceKind::Api => Self::Api {
                url: data.url.clone().unwrap_or_default(),
                json_path: data.json_path.clone().filter(|p| !p.is_empty()),
            },
            SourceKind::Other => Self::Invalid {
                reason: format!("Unknown data source '{}'", data.source),
            },
        })
    }
}

/// Payload of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutput {
    Text(String),
    Todos(Vec<TodoItem>),
}

/// Outcome of a single fetch attempt for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub component_id: ComponentId,
    pub output: FetchOutput,
    pub error: Option<String>,
}

impl FetchResult {
    pub fn text(component_id: ComponentId, source: SourceOutput) -> Self {
        Self {
            component_id,
            output: FetchOutput::Text(source.output),
            error: source.error,
        }
    }

    pub fn todos(component_id: ComponentId, items: Vec<TodoItem>) -> Self {
        Self {
            component_id,
            output: FetchOutput::Todos(items),
            error: None,
        }
    }

    /// Text payload, or an empty string for structured results.
    pub fn text_output(&self) -> &str {
        match &self.output {
            FetchOutput::Text(text) => text,
            FetchOutput::Todos(_) => "",
        }
    }
}

/// Executes `request` and tags the outcome with `component_id`.
pub async fn fetch(component_id: ComponentId, request: FetchRequest) -> FetchResult {
    tracing::debug!(component = %component_id, ?request, "fetch started");
    let result = match request {
        FetchRequest::Script { command } => {
            FetchResult::text(component_id, run_script(&command).await)
        }
        FetchRequest::Api { url, json_path } => {
            FetchResult::text(component_id, run_api(&url, json_path.as_deref()).await)
        }
        FetchRequest::TodoFile { path } => match read_todo_file_async(&path).await {
            Ok(items) => FetchResult::todos(component_id, items),
            Err(e) => FetchResult {
                component_id,
                output: FetchOutput::Todos(Vec::new()),
                error: Some(format!("{e:#}")),
            },
        },
        FetchRequest::Invalid { reason } => {
            FetchResult::text(component_id, SourceOutput::failed(reason))
        }
    };

    if let Some(error) = &result.error {
        tracing::warn!(component = %result.component_id, %error, "fetch failed");
    }
    result
}
