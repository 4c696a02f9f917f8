use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod logging;
mod services;
mod tools;
mod ui;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The registry config carries the audit log path, so it loads before
    // logging comes up.
    let config = config::DeployConfig::load(cli.config.as_deref())?;
    logging::init(&config.log_file, cli.verbose)?;

    match cli.command {
        Commands::Version { project } => {
            commands::version::execute(&config, &cli.roles, &cli.hosts, project.as_deref()).await?;
        }
        Commands::Deploy { project, commit } => {
            commands::deploy::execute(
                &config,
                &cli.roles,
                &cli.hosts,
                project.as_deref(),
                commit.as_deref(),
            )
            .await?;
        }
        Commands::ReloadApache => {
            commands::reload_apache::execute(&config, &cli.roles, &cli.hosts).await?;
        }
        Commands::SyncFromProd { project } => {
            commands::sync_from_prod::execute(&config, &cli.roles, &cli.hosts, project.as_deref())
                .await?;
        }
    }

    Ok(())
}
