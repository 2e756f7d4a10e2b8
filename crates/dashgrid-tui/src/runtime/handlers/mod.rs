//! Effect handlers for the runtime.
//!
//! Handlers are async functions returning the `UiEvent` that reports their
//! outcome. They never touch `AppState`; the runtime spawns them and routes
//! the event through the inbox.

pub mod fetch;
pub mod todo;

pub use fetch::{fetch_component, refresh_timer};
pub use todo::{PersistJob, TodoWriter};
