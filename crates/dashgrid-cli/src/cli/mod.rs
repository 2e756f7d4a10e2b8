//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dashgrid_core::config::{DEFAULT_CONFIG_FILE, Dashboard};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "dashgrid")]
#[command(version)]
#[command(about = "Terminal dashboard of independently refreshed panels")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dashboard config file (JSON, or TOML with a .toml extension)
    #[arg(short, long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Append logs to this file (logs are discarded otherwise)
    #[arg(long, global = true, value_name = "PATH", env = "DASHGRID_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Validate the config and list its components
    Check,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Flushes buffered log lines when dropped.
    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        config,
        log_file: _,
    } = cli;

    let dashboard = Dashboard::load(&config)?;
    tracing::info!(
        path = %config.display(),
        components = dashboard.components().len(),
        "Dashboard config loaded"
    );

    match command {
        None => commands::dashboard::run(dashboard).await,
        Some(Commands::Check) => commands::check::run(&config, &dashboard),
    }
}
