//! Remote command execution over SSH
//!
//! Every remote operation is a one-shot `ssh user@host '<command>'`
//! invocation through the system ssh binary. A command with a working
//! directory gets a `cd <dir> && ` prefix on the remote side, so directory
//! context never leaks into the next command.

use tokio::process::Command;
use tracing::info;

use crate::domain::environment::HostTarget;
use crate::domain::plan::RemoteCommand;
use crate::error::RemoteError;
use crate::tools;

/// Client bound to a single remote target for the whole invocation
pub struct SshClient {
    target: HostTarget,
}

impl SshClient {
    pub fn new(target: HostTarget) -> Self {
        Self { target }
    }

    /// Shell line actually sent to the remote side.
    fn remote_line(command: &RemoteCommand) -> String {
        match &command.cwd {
            Some(dir) => format!("cd {} && {}", dir.display(), command.line),
            None => command.line.clone(),
        }
    }

    /// Argument vector for one ssh invocation.
    fn ssh_args(&self, command: &RemoteCommand) -> Vec<String> {
        vec![self.target.to_string(), Self::remote_line(command)]
    }

    /// Run one remote command to completion, inheriting stdout/stderr so the
    /// operator sees the remote output live. A nonzero exit status is an
    /// error; callers abort their sequence on it.
    pub async fn run(&self, command: &RemoteCommand) -> Result<(), RemoteError> {
        info!("[{}] run: {}", self.target, command.line);

        let program = tools::get_tool_path(tools::SSH);
        let status = Command::new(&program)
            .args(self.ssh_args(command))
            .status()
            .await
            .map_err(|e| RemoteError::SpawnFailed {
                program: program.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(RemoteError::CommandFailed {
                host: self.target.to_string(),
                command: command.line.clone(),
                code: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}
