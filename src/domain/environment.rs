//! Environment resolution
//!
//! Turns the CLI role/host binding plus the registry configuration into an
//! immutable [`EnvironmentContext`]. The context is built once per invocation
//! and passed explicitly to every operation; nothing mutates it afterwards.
//!
//! Role selectors come in two forms:
//! - plain (`dev`, `stg`, `prod`) - project must be given explicitly
//! - namespaced (`metropol:stg`) - project and effective role derived by
//!   splitting on `:`
//!
//! An explicit `--project` wins over derivation, in which case the selector
//! string is used as the effective role unchanged.

use std::fmt;
use std::path::PathBuf;

use crate::config::DeployConfig;
use crate::error::ConfigError;

/// Role used when the invocation binds none.
pub const DEFAULT_ROLE: &str = "dev";

/// A remote login target in `user@host` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub user: String,
    pub host: String,
}

impl HostTarget {
    /// Parse a `user@host` registry entry.
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        match entry.split_once('@') {
            Some((user, host)) if !user.is_empty() && !host.is_empty() => Ok(Self {
                user: user.to_string(),
                host: host.to_string(),
            }),
            _ => Err(ConfigError::InvalidHostEntry {
                entry: entry.to_string(),
            }),
        }
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

/// Immutable per-invocation deployment environment
#[derive(Debug, Clone)]
pub struct EnvironmentContext {
    pub project: String,
    pub role: String,
    pub target: HostTarget,
    /// Remote build tree root, `/home/<user>/build`.
    pub build_path: PathBuf,
    /// Fully interpolated webroot for this project and role.
    pub webroot: String,
    /// Template the webroot came from; sibling-role webroots (prod/stg)
    /// for the sync operation are derived from it.
    pub webroot_template: String,
}

impl EnvironmentContext {
    /// Webroot for the same project under a different role.
    pub fn webroot_for_role(&self, role: &str) -> String {
        expand_webroot(&self.webroot_template, &self.project, role)
    }

    /// Last path segment of the webroot, recorded as the site name in the
    /// audit trail.
    pub fn site_name(&self) -> &str {
        self.webroot.rsplit('/').next().unwrap_or(&self.webroot)
    }

    /// Fields required to locate the target environment (user, host, webroot).
    pub fn ensure_resolved(&self) -> Result<(), ConfigError> {
        if self.target.user.is_empty() {
            return Err(ConfigError::MissingField { field: "user" });
        }
        if self.target.host.is_empty() {
            return Err(ConfigError::MissingField { field: "host" });
        }
        if self.webroot.is_empty() {
            return Err(ConfigError::MissingField { field: "webroot" });
        }
        Ok(())
    }

    /// Deploys additionally require a non-empty effective role.
    pub fn ensure_deployable(&self) -> Result<(), ConfigError> {
        self.ensure_resolved()?;
        if self.role.is_empty() {
            return Err(ConfigError::MissingField { field: "role" });
        }
        Ok(())
    }
}

/// Resolve the role selector and primary target without requiring a project.
///
/// The selector is the first of the bound roles, defaulting to `dev`.
/// `--hosts` entries override the registry lookup; otherwise the full
/// selector string is the registry key, so `metropol:stg` is looked up
/// as-is. Only the first entry is acted on.
pub fn resolve_target(
    config: &DeployConfig,
    roles: &[String],
    hosts: &[String],
) -> Result<(String, HostTarget), ConfigError> {
    let selector = roles
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_ROLE)
        .to_string();

    let primary = if let Some(entry) = hosts.first() {
        entry.clone()
    } else {
        let entries = config
            .hosts_for_role(&selector)
            .ok_or_else(|| ConfigError::RoleNotFound {
                role: selector.clone(),
            })?;
        entries
            .first()
            .ok_or_else(|| ConfigError::NoHosts {
                role: selector.clone(),
            })?
            .clone()
    };

    Ok((selector, HostTarget::parse(&primary)?))
}

/// Resolve the full deployment environment for an invocation.
pub fn resolve(
    config: &DeployConfig,
    roles: &[String],
    hosts: &[String],
    project: Option<&str>,
) -> Result<EnvironmentContext, ConfigError> {
    let (selector, target) = resolve_target(config, roles, hosts)?;

    let (project, role) = match project {
        Some(explicit) => (explicit.to_string(), selector),
        None => {
            let parts: Vec<&str> = selector.split(':').collect();
            if parts.len() == 2 {
                (parts[0].to_string(), parts[1].to_string())
            } else {
                (String::new(), selector)
            }
        }
    };
    if project.is_empty() {
        return Err(ConfigError::ProjectUnresolved);
    }

    let build_path = PathBuf::from("/home").join(&target.user).join("build");
    let webroot_template = config.webroot_template(&target.host)?.to_string();
    let webroot = expand_webroot(&webroot_template, &project, &role);

    Ok(EnvironmentContext {
        project,
        role,
        target,
        build_path,
        webroot,
        webroot_template,
    })
}

/// Interpolate `{project}` and `{role}` into a webroot template.
pub fn expand_webroot(template: &str, project: &str, role: &str) -> String {
    template
        .replace("{project}", project)
        .replace("{role}", role)
}
