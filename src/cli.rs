//! CLI definitions for dingctl
//!
//! This module contains all CLI argument parsing structures using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dingctl",
    version,
    about = "Deployment orchestrator for Ding library sites",
    long_about = "Drives checkout, build, cache-clear and database sync for Ding sites\nover SSH, selected through a role/host registry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Roles to bind, comma separated; the first selects the environment
    #[arg(long, global = true, value_delimiter = ',')]
    pub roles: Vec<String>,

    /// Explicit target hosts (user@host, comma separated), overriding the role registry
    #[arg(long, global = true, value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// Path to the registry config file
    #[arg(long, global = true, env = "DINGCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the currently deployed version
    Version {
        /// Project name (derived from a project:role selector when omitted)
        #[arg(long)]
        project: Option<String>,
    },

    /// Deploy a specific commit to the selected environment
    Deploy {
        /// Project name (derived from a project:role selector when omitted)
        #[arg(long)]
        project: Option<String>,

        /// Commit to deploy, 6-40 hex characters (prompted for when omitted)
        #[arg(long)]
        commit: Option<String>,
    },

    /// Reload Apache on the remote machine
    ReloadApache,

    /// Sync the staging database and files from production
    SyncFromProd {
        /// Project name (derived from a project:role selector when omitted)
        #[arg(long)]
        project: Option<String>,
    },
}
