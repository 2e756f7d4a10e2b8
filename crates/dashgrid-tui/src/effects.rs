//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer never spawns tasks or touches files itself.

use std::path::PathBuf;
use std::time::Duration;

use dashgrid_core::config::ComponentId;
use dashgrid_core::fetch::FetchRequest;
use dashgrid_core::todo::TodoItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Run one fetch and deliver `FetchCompleted`.
    Fetch {
        component_id: ComponentId,
        request: FetchRequest,
    },

    /// Sleep `interval`, then deliver `RefreshDue`.
    ScheduleRefresh {
        component_id: ComponentId,
        interval: Duration,
    },

    /// Rewrite a todo file with the full item list.
    PersistTodos {
        component_id: ComponentId,
        path: PathBuf,
        items: Vec<TodoItem>,
    },
}
