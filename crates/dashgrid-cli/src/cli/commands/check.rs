//! `dashgrid check`: non-interactive config validation.

use std::io::{Write, stdout};
use std::path::Path;

use anyhow::{Result, bail};
use dashgrid_core::config::Dashboard;
use dashgrid_tui::components::{Panel, PanelBody};

/// Prints every component with its resolved id and type.
///
/// Components the dashboard would show as errors (unknown type, missing data
/// source, table without columns) make the check fail.
///
/// # Errors
/// Returns an error if any component is misconfigured.
pub fn run(path: &Path, dashboard: &Dashboard) -> Result<()> {
    let mut out = stdout().lock();
    writeln!(out, "{}", path.display())?;

    let components = dashboard.components();
    let id_width = components
        .iter()
        .map(|c| c.id.as_str().len())
        .max()
        .unwrap_or(0);
    let mut invalid = 0;
    for component in &components {
        let panel = Panel::from_config(component);
        let refresh = match panel.refresh_interval() {
            Some(interval) => format!("every {}s", interval.as_secs()),
            None => "once".to_string(),
        };
        write!(
            out,
            "  {:<id_width$}  {:<10} {:<10}",
            component.id.as_str(),
            component.kind,
            refresh
        )?;
        if let PanelBody::Error(error) = panel.body() {
            invalid += 1;
            write!(out, " error: {}", error.message())?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{} component(s)", components.len())?;

    if invalid > 0 {
        bail!("{invalid} component(s) have configuration errors");
    }
    Ok(())
}
