//! Gracefully reload the web server on the bound host.

use anyhow::Result;

use crate::config::DeployConfig;
use crate::domain::environment;
use crate::domain::plan::{self, RemoteCommand};
use crate::infrastructure::SshClient;
use crate::ui;

pub async fn execute(config: &DeployConfig, roles: &[String], hosts: &[String]) -> Result<()> {
    let (_selector, target) = environment::resolve_target(config, roles, hosts)?;

    let ssh = SshClient::new(target.clone());
    ssh.run(&RemoteCommand::new(plan::RELOAD_APACHE_COMMAND))
        .await?;

    ui::print_success(&format!("Apache reloaded on {}", target.host));
    Ok(())
}
