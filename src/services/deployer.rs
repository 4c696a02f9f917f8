//! Deployment sequencing
//!
//! Runs the planned remote command sequences for one resolved environment:
//! the version check, the fetch/checkout/build/cache-clear pipeline, and the
//! staging sync. Execution is strictly sequential; the first failing command
//! aborts the rest of the sequence and already-applied steps stay applied.

use std::time::Instant;

use tracing::{info, warn};

use crate::domain::commit::Commit;
use crate::domain::environment::EnvironmentContext;
use crate::domain::plan::{self, PlannedStep, StepResult};
use crate::error::DeployError;
use crate::infrastructure::remote::SshClient;

/// Executes remote operation sequences against one resolved environment
pub struct Deployer {
    ctx: EnvironmentContext,
    ssh: SshClient,
}

impl Deployer {
    pub fn new(ctx: EnvironmentContext) -> Self {
        let ssh = SshClient::new(ctx.target.clone());
        Self { ctx, ssh }
    }

    pub fn context(&self) -> &EnvironmentContext {
        &self.ctx
    }

    /// Show the commit currently checked out in the remote build directory.
    ///
    /// Doubles as the pre-deploy verification: it exercises the resolved
    /// environment with a harmless command before anything destructive runs.
    pub async fn show_current_version(&self) -> Result<(), DeployError> {
        self.ctx.ensure_resolved()?;
        self.ssh.run(&plan::plan_version(&self.ctx)).await?;
        Ok(())
    }

    /// Run the deploy pipeline for `commit` and append the audit line on
    /// success.
    pub async fn deploy(&self, commit: &Commit) -> Result<Vec<StepResult>, DeployError> {
        self.ctx.ensure_deployable()?;

        let build_dir = plan::build_dir_name(chrono::Local::now().naive_local());
        let steps = plan::plan_deploy(&self.ctx, commit, &build_dir);
        info!(
            "Starting build in {}",
            plan::checkout_dir(&self.ctx).join(&build_dir).display()
        );

        let results = self.run_steps(&steps).await?;

        // The only line a normal run persists to the audit log.
        warn!("{}", plan::audit_line(&self.ctx, &operator_name(), commit));

        Ok(results)
    }

    /// Replace the staging database and files with production data.
    pub async fn sync_from_prod(&self) -> Result<(), DeployError> {
        let commands = plan::plan_sync_from_prod(&self.ctx)?;
        for command in &commands {
            self.ssh.run(command).await?;
        }
        Ok(())
    }

    async fn run_steps(&self, steps: &[PlannedStep]) -> Result<Vec<StepResult>, DeployError> {
        let total = steps.len();
        let mut results = Vec::with_capacity(total);

        for (index, planned) in steps.iter().enumerate() {
            info!(
                "━━━ Step {}/{}: {} ━━━",
                index + 1,
                total,
                planned.step.name()
            );
            let start = Instant::now();

            match self.ssh.run(&planned.command).await {
                Ok(()) => {
                    results.push(StepResult::success(planned.step, start.elapsed()));
                }
                Err(e) => {
                    results.push(StepResult::failure(planned.step, start.elapsed(), e.to_string()));
                    print_step_summary(&results);
                    return Err(e.into());
                }
            }
        }

        print_step_summary(&results);
        Ok(results)
    }
}

/// Local account name recorded as the acting user in the audit trail.
fn operator_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn print_step_summary(results: &[StepResult]) {
    println!();
    for result in results {
        let status = if result.success { "✅" } else { "❌" };
        print!(
            "   {} {} ({:.1}s)",
            status,
            result.step.name(),
            result.duration.as_secs_f64()
        );
        match &result.message {
            Some(message) => println!(" - {}", message),
            None => println!(),
        }
    }
    println!();
}
