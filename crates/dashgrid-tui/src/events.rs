//! UI events consumed by the reducer.

use crossterm::event::Event;
use dashgrid_core::config::ComponentId;
use dashgrid_core::fetch::FetchResult;

/// Everything the reducer reacts to.
///
/// Terminal input comes from the runtime's poll loop; the rest arrives through
/// the inbox from spawned tasks, each task sending exactly one event.
#[derive(Debug)]
pub enum UiEvent {
    /// Render cadence.
    Tick,
    /// Current terminal size, prepended to every batch of events.
    Frame { width: u16, height: u16 },
    /// Raw keyboard, mouse or resize input.
    Terminal(Event),
    /// A fetch finished (successfully or not).
    FetchCompleted(FetchResult),
    /// A refresh timer fired.
    RefreshDue { component_id: ComponentId },
    /// A todo file rewrite finished.
    TodosPersisted {
        component_id: ComponentId,
        result: Result<(), String>,
    },
}
