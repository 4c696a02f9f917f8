//! Deploy a specific commit to the selected environment.

use anyhow::Result;
use dialoguer::Input;

use crate::config::DeployConfig;
use crate::domain::commit::Commit;
use crate::domain::environment;
use crate::services::Deployer;
use crate::ui;

pub async fn execute(
    config: &DeployConfig,
    roles: &[String],
    hosts: &[String],
    project: Option<&str>,
    commit: Option<&str>,
) -> Result<()> {
    let ctx = environment::resolve(config, roles, hosts, project)?;
    ui::print_header(&format!("Deploy: {} ({})", ctx.project, ctx.role));

    let deployer = Deployer::new(ctx);

    // Show what is deployed right now, before anything destructive happens.
    deployer.show_current_version().await?;

    let commit = match commit {
        Some(value) => Commit::parse(value)?,
        None => prompt_for_commit()?,
    };

    deployer.deploy(&commit).await?;

    ui::print_success(&format!(
        "Deployed {} to {}",
        commit.short(),
        deployer.context().webroot
    ));
    Ok(())
}

/// Interactive commit prompt. Invalid input re-prompts instead of aborting.
fn prompt_for_commit() -> Result<Commit> {
    let value: String = Input::new()
        .with_prompt("Enter commit to deploy (40 character SHA1)")
        .validate_with(|input: &String| Commit::parse(input).map(|_| ()))
        .interact_text()?;
    Ok(Commit::parse(&value)?)
}
