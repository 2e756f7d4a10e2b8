//! Full-screen terminal dashboard.

pub mod common;
pub mod components;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use dashgrid_core::config::Dashboard;
pub use runtime::TuiRuntime;

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub async fn run_dashboard(dashboard: Dashboard) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The dashboard requires a terminal.\n\
             Use `dashgrid check` to validate a config non-interactively."
        );
    }

    let mut runtime = TuiRuntime::new(dashboard)?;
    runtime.run()
}
