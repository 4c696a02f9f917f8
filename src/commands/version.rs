//! Show the currently deployed version of a site.

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
    ui::print_info(&format!(
        "Deployed version of {} on {}",
        ctx.webroot, ctx.target
    ));

    let deployer = Deployer::new(ctx);
    deployer.show_current_version().await?;

    Ok(())
}
