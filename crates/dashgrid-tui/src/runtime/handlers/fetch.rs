use std::time::Duration;

use dashgrid_core::config::ComponentId;
use dashgrid_core::fetch::{self, FetchRequest};

use crate::events::UiEvent;

/// Runs one fetch for a component.
pub async fn fetch_component(component_id: ComponentId, request: FetchRequest) -> UiEvent {
    UiEvent::FetchCompleted(fetch::fetch(component_id, request).await)
}

/// Waits one refresh interval.
///
/// The reducer answers `RefreshDue` with a fetch and a new timer, so each
/// refreshing component always has exactly one timer pending.
pub async fn refresh_timer(component_id: ComponentId, interval: Duration) -> UiEvent {
    tokio::time::sleep(interval).await;
    tracing::debug!(id = %component_id, ?interval, "Refresh due");
    UiEvent::RefreshDue { component_id }
}
