//! Centralized error types for dingctl
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Top-level error type for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// Registry and environment resolution errors
#[derive(Error, Debug)]
pub enum ConfigError {
    // Legacy wording, kept verbatim.
    #[error("no project in role and no project specified")]
    ProjectUnresolved,

    #[error("Role '{role}' is not defined in the role registry")]
    RoleNotFound { role: String },

    #[error("Role '{role}' has no host entries")]
    NoHosts { role: String },

    #[error("Invalid host entry '{entry}'. Expected: user@host")]
    InvalidHostEntry { entry: String },

    #[error("Webroot registry is missing the 'default' template")]
    MissingDefaultWebroot,

    #[error("Required environment field missing: {field}")]
    MissingField { field: &'static str },

    #[error("Failed to read config file {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    FileParse { path: String, message: String },
}

/// Commit identifier validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid commit id '{value}'. Expected: 6-40 hex characters")]
    InvalidCommit { value: String },
}

/// Remote command execution errors
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("Remote command failed on {host} (exit {code}): {command}")]
    CommandFailed {
        host: String,
        command: String,
        code: i32,
    },
}

/// Role policy violations
#[derive(Error, Debug)]
pub enum PolicyError {
    // Legacy wording, trailing period included.
    #[error("sync_from_prod is not supported for non-stg roles.")]
    NotStaging,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_unresolved_display() {
        let err = ConfigError::ProjectUnresolved;
        assert_eq!(
            err.to_string(),
            "no project in role and no project specified"
        );
    }

    #[test]
    fn test_policy_error_display() {
        let err = PolicyError::NotStaging;
        assert_eq!(
            err.to_string(),
            "sync_from_prod is not supported for non-stg roles."
        );
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::CommandFailed {
            host: "kkbdeploy@halla.dbc.dk".to_string(),
            command: "git fetch".to_string(),
            code: 128,
        };
        let message = err.to_string();
        assert!(message.contains("kkbdeploy@halla.dbc.dk"));
        assert!(message.contains("git fetch"));
        assert!(message.contains("128"));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::ProjectUnresolved;
        let deploy_err: DeployError = config_err.into();
        assert!(matches!(deploy_err, DeployError::Config(_)));
    }
}
