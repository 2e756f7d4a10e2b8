use anyhow::Result;
use dashgrid_core::config::Dashboard;

/// Runs the interactive dashboard.
pub async fn run(dashboard: Dashboard) -> Result<()> {
    dashgrid_tui::run_dashboard(dashboard).await
}
