//! Sync the staging environment from production.

use anyhow::Result;

use crate::config::DeployConfig;
use crate::domain::environment;
use crate::services::Deployer;
use crate::ui;

pub async fn execute(
    config: &DeployConfig,
    roles: &[String],
    hosts: &[String],
    project: Option<&str>,
) -> Result<()> {
    let ctx = environment::resolve(config, roles, hosts, project)?;
    ui::print_header(&format!("Sync from prod: {}", ctx.project));
    ui::print_warning(&format!(
        "Replacing the {} staging database and files with production data",
        ctx.project
    ));

    let deployer = Deployer::new(ctx);
    deployer.sync_from_prod().await?;

    ui::print_success("Staging synced from production");
    Ok(())
}
