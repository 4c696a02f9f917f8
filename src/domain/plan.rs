//! Deployment planning
//!
//! Pure construction of the remote command sequences. Planning never touches
//! the network, so every exact command line is unit testable; the services
//! layer feeds plans to the ssh executor and reports per-step results.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::domain::commit::Commit;
use crate::domain::environment::EnvironmentContext;
use crate::error::PolicyError;

/// External build driver invoked inside the remote checkout.
const BUILD_DRIVER: &str = "./ding_build.py";

/// Cache-clear endpoint, local to the remote host.
const CACHE_CLEAR_URL: &str = "http://localhost/apc_clear_cache.php";

/// Database name template for the dump-and-restore sync.
const DATABASE_TEMPLATE: &str = "drupal6_ding_{project}_{role}";

/// Web server reload command (requires sudo on the target).
pub const RELOAD_APACHE_COMMAND: &str = "sudo /usr/sbin/apache2ctl graceful";

/// A single shell command destined for the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    /// Working directory established for this command only. Commands
    /// without one run from the login directory.
    pub cwd: Option<PathBuf>,
    pub line: String,
}

impl RemoteCommand {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            cwd: None,
            line: line.into(),
        }
    }

    pub fn in_dir(cwd: PathBuf, line: impl Into<String>) -> Self {
        Self {
            cwd: Some(cwd),
            line: line.into(),
        }
    }
}

/// Steps of the deploy pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    /// Update remote refs
    Fetch,
    /// Check out the requested commit
    Checkout,
    /// Run the external build driver
    Build,
    /// Clear the opcode cache through the local HTTP endpoint
    ClearCache,
}

impl DeployStep {
    /// Get human-readable name for the step
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetch => "Fetch",
            Self::Checkout => "Checkout",
            Self::Build => "Build",
            Self::ClearCache => "Clear Cache",
        }
    }
}

/// A deploy step paired with the command that realizes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: DeployStep,
    pub command: RemoteCommand,
}

/// Result of one executed step
#[derive(Debug)]
pub struct StepResult {
    pub step: DeployStep,
    pub success: bool,
    pub duration: Duration,
    pub message: Option<String>,
}

impl StepResult {
    pub fn success(step: DeployStep, duration: Duration) -> Self {
        Self {
            step,
            success: true,
            duration,
            message: None,
        }
    }

    pub fn failure(step: DeployStep, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            duration,
            message: Some(message.into()),
        }
    }
}

/// Remote directory holding the project checkout.
pub fn checkout_dir(ctx: &EnvironmentContext) -> PathBuf {
    ctx.build_path.join(&ctx.project).join("build")
}

/// Command showing the currently deployed commit metadata.
pub fn plan_version(ctx: &EnvironmentContext) -> RemoteCommand {
    RemoteCommand::in_dir(checkout_dir(ctx), "git show | head -10")
}

/// Build directory name for a deploy started at `at`.
///
/// Legacy format: `ding-` + `%Y%m%d%H%M` with the final character dropped,
/// grouping directories in ten-minute buckets.
pub fn build_dir_name(at: NaiveDateTime) -> String {
    let mut name = at.format("ding-%Y%m%d%H%M").to_string();
    name.pop();
    name
}

/// Ordered command plan for deploying `commit` into the environment.
///
/// The checkout directory is scoped to the git and build steps; the
/// cache-clear request runs from the default remote working directory.
pub fn plan_deploy(ctx: &EnvironmentContext, commit: &Commit, build_dir: &str) -> Vec<PlannedStep> {
    let cwd = checkout_dir(ctx);
    vec![
        PlannedStep {
            step: DeployStep::Fetch,
            command: RemoteCommand::in_dir(cwd.clone(), "git fetch"),
        },
        PlannedStep {
            step: DeployStep::Checkout,
            command: RemoteCommand::in_dir(cwd.clone(), format!("git checkout {}", commit)),
        },
        PlannedStep {
            step: DeployStep::Build,
            command: RemoteCommand::in_dir(
                cwd,
                format!("{} -lL {} -m profile {}", BUILD_DRIVER, ctx.role, build_dir),
            ),
        },
        PlannedStep {
            step: DeployStep::ClearCache,
            command: RemoteCommand::new(format!("curl -s {}", CACHE_CLEAR_URL)),
        },
    ]
}

/// Command plan for syncing staging from production.
///
/// Only the `stg` role may run this; planning fails for any other role
/// before a single command is issued. The database restore and file mirror
/// are destructive on the staging side.
pub fn plan_sync_from_prod(ctx: &EnvironmentContext) -> Result<Vec<RemoteCommand>, PolicyError> {
    if ctx.role != "stg" {
        return Err(PolicyError::NotStaging);
    }

    let dump = format!(
        "mysqldump {} | mysql {}",
        expand_database(&ctx.project, "prod"),
        expand_database(&ctx.project, "stg"),
    );
    let mirror = format!(
        "sudo rsync -avmCF --delete {}/files/ {}/files/",
        ctx.webroot_for_role("prod"),
        ctx.webroot_for_role("stg"),
    );
    Ok(vec![RemoteCommand::new(dump), RemoteCommand::new(mirror)])
}

fn expand_database(project: &str, role: &str) -> String {
    DATABASE_TEMPLATE
        .replace("{project}", project)
        .replace("{role}", role)
}

/// Audit line appended to the log after a successful deploy.
pub fn audit_line(ctx: &EnvironmentContext, operator: &str, commit: &Commit) -> String {
    format!("{} | {} | {}", ctx.site_name(), operator, commit.short())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeployConfig;
    use crate::domain::environment;
    use chrono::NaiveDate;

    fn dev_ctx() -> EnvironmentContext {
        let config = DeployConfig::default();
        let roles = vec!["dev".to_string()];
        environment::resolve(&config, &roles, &[], Some("kkb")).unwrap()
    }

    fn stg_ctx() -> EnvironmentContext {
        let config = DeployConfig::default();
        let roles = vec!["stg".to_string()];
        environment::resolve(&config, &roles, &[], Some("kkb")).unwrap()
    }

    #[test]
    fn test_checkout_dir() {
        assert_eq!(
            checkout_dir(&dev_ctx()),
            PathBuf::from("/home/kkbdeploy/build/kkb/build")
        );
    }

    #[test]
    fn test_plan_version() {
        let command = plan_version(&dev_ctx());
        assert_eq!(
            command.cwd,
            Some(PathBuf::from("/home/kkbdeploy/build/kkb/build"))
        );
        assert_eq!(command.line, "git show | head -10");
    }

    #[test]
    fn test_build_dir_name_drops_final_minute_digit() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        assert_eq!(build_dir_name(at), "ding-20240301101");
    }

    #[test]
    fn test_build_dir_name_year_boundary() {
        let at = NaiveDate::from_ymd_opt(2019, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(build_dir_name(at), "ding-20191231235");
    }

    #[test]
    fn test_plan_deploy_step_order_and_commands() {
        let ctx = dev_ctx();
        let commit = Commit::parse("abc1234").unwrap();
        let steps = plan_deploy(&ctx, &commit, "ding-20240301101");

        let names: Vec<&str> = steps.iter().map(|s| s.step.name()).collect();
        assert_eq!(names, ["Fetch", "Checkout", "Build", "Clear Cache"]);

        assert_eq!(steps[0].command.line, "git fetch");
        assert_eq!(steps[1].command.line, "git checkout abc1234");
        assert_eq!(
            steps[2].command.line,
            "./ding_build.py -lL dev -m profile ding-20240301101"
        );
        assert_eq!(
            steps[3].command.line,
            "curl -s http://localhost/apc_clear_cache.php"
        );
    }

    #[test]
    fn test_plan_deploy_scopes_checkout_dir_to_git_and_build() {
        let ctx = dev_ctx();
        let commit = Commit::parse("abc1234").unwrap();
        let steps = plan_deploy(&ctx, &commit, "ding-20240301101");
        let cwd = PathBuf::from("/home/kkbdeploy/build/kkb/build");

        assert_eq!(steps[0].command.cwd.as_ref(), Some(&cwd));
        assert_eq!(steps[1].command.cwd.as_ref(), Some(&cwd));
        assert_eq!(steps[2].command.cwd.as_ref(), Some(&cwd));
        // The cache-clear call runs from the default remote directory.
        assert_eq!(steps[3].command.cwd, None);
    }

    #[test]
    fn test_plan_sync_from_prod_commands() {
        let commands = plan_sync_from_prod(&stg_ctx()).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0].line,
            "mysqldump drupal6_ding_kkb_prod | mysql drupal6_ding_kkb_stg"
        );
        assert_eq!(
            commands[1].line,
            "sudo rsync -avmCF --delete /data/www/kkb.prod.ting.dk/files/ /data/www/kkb.stg.ting.dk/files/"
        );
    }

    #[test]
    fn test_plan_sync_from_prod_rejects_non_stg_roles() {
        let err = plan_sync_from_prod(&dev_ctx()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sync_from_prod is not supported for non-stg roles."
        );
    }

    #[test]
    fn test_audit_line_format() {
        let ctx = dev_ctx();
        let commit = Commit::parse("abc1234abc1234abc1234abc1234abc1234abc12").unwrap();
        assert_eq!(
            audit_line(&ctx, "jdoe", &commit),
            "kkb.dev.ting.dk | jdoe | abc1234"
        );
    }

    #[test]
    fn test_audit_line_with_abbreviated_commit() {
        let ctx = dev_ctx();
        let commit = Commit::parse("abc1234").unwrap();
        assert_eq!(
            audit_line(&ctx, "operator", &commit),
            "kkb.dev.ting.dk | operator | abc1234"
        );
    }
}
