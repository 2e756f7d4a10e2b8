//! Ordered todo file writer.
//!
//! Every todo mutation rewrites the whole file. Writes go through a single
//! task so they land in the order the reducer issued them.

use std::path::PathBuf;

use dashgrid_core::config::ComponentId;
use dashgrid_core::todo::{TodoItem, write_todo_file};
use tokio::sync::mpsc;

use crate::events::UiEvent;
use crate::runtime::inbox::UiEventSender;

/// One full-file rewrite.
#[derive(Debug)]
pub struct PersistJob {
    pub component_id: ComponentId,
    pub path: PathBuf,
    pub items: Vec<TodoItem>,
}

/// Handle to the writer task.
#[derive(Debug, Clone)]
pub struct TodoWriter {
    tx: mpsc::UnboundedSender<PersistJob>,
}

impl TodoWriter {
    /// Spawns the writer task. It stops once every handle is dropped.
    pub fn spawn(inbox: UiEventSender) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PersistJob>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if inbox.send(persist(job).await).is_err() {
                    break;
                }
            }
        });
        Self { tx }
    }

    pub fn submit(&self, job: PersistJob) {
        if self.tx.send(job).is_err() {
            tracing::warn!("Todo writer is not running; change not saved");
        }
    }
}

/// Writes the items and reports the outcome.
pub async fn persist(job: PersistJob) -> UiEvent {
    let PersistJob {
        component_id,
        path,
        items,
    } = job;
    let target = path.clone();
    let result = tokio::task::spawn_blocking(move || write_todo_file(&target, &items))
        .await
        .unwrap_or_else(|e| Err(anyhow::anyhow!("Task failed: {e}")))
        .map_err(|e| format!("{e:#}"));

    match &result {
        Ok(()) => tracing::debug!(id = %component_id, path = %path.display(), "Todos saved"),
        Err(error) => tracing::warn!(id = %component_id, path = %path.display(), "{error}"),
    }
    UiEvent::TodosPersisted {
        component_id,
        result,
    }
}
