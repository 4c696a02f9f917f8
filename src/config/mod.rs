//! # Deployment Registry Configuration
//!
//! Role and webroot lookup tables driving environment resolution.
//!
//! ## Configuration File
//!
//! `deploy.yaml` in the working directory (or the path given via
//! `--config` / `DINGCTL_CONFIG`). Every section is optional; missing
//! sections fall back to the built-in registry for the Ding sites.
//!
//! ```yaml
//! roles:
//!   dev: ["kkbdeploy@halla.dbc.dk"]
//!   "metropol:stg": ["deploy@haruna.dbc.dk"]
//! webroots:
//!   default: "/data/www/{project}.{role}"
//!   halla.dbc.dk: "/data/www/{project}.{role}.ting.dk"
//! log_file: /tmp/deploy.log
//! ```
//!
//! Required keys are validated eagerly at load time: the webroot table must
//! carry a `default` template and every role needs at least one `user@host`
//! entry. Lookups after a successful load cannot fail on missing keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::environment::HostTarget;
use crate::error::ConfigError;

/// Webroot table key used when a host has no dedicated template.
pub const DEFAULT_WEBROOT_KEY: &str = "default";

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "deploy.yaml";

/// Role and webroot registry plus log sink location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Role selector (optionally `project:role` namespaced) to ordered
    /// `user@host` entries. The first entry is the primary target.
    #[serde(default = "default_roles")]
    pub roles: BTreeMap<String, Vec<String>>,

    /// Host to webroot template with `{project}` and `{role}` placeholders.
    #[serde(default = "default_webroots")]
    pub webroots: BTreeMap<String, String>,

    /// Append-only audit log location.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_roles() -> BTreeMap<String, Vec<String>> {
    let mut roles = BTreeMap::new();
    roles.insert("dev".to_string(), vec!["kkbdeploy@halla.dbc.dk".to_string()]);
    roles.insert("stg".to_string(), vec!["kkbdeploy@hiri.dbc.dk".to_string()]);
    roles.insert("prod".to_string(), vec!["kkbdeploy@hiri.dbc.dk".to_string()]);
    roles.insert(
        "metropol:stg".to_string(),
        vec!["deploy@haruna.dbc.dk".to_string()],
    );
    roles.insert(
        "metropol:prod".to_string(),
        vec!["deploy@haruna.dbc.dk".to_string()],
    );
    roles.insert(
        "aabenraa:stg".to_string(),
        vec!["deploy@aabenraa.dbc.dk".to_string()],
    );
    roles.insert(
        "aabenraa:prod".to_string(),
        vec!["deploy@aabenraa.dbc.dk".to_string()],
    );
    roles
}

fn default_webroots() -> BTreeMap<String, String> {
    let mut webroots = BTreeMap::new();
    webroots.insert(
        DEFAULT_WEBROOT_KEY.to_string(),
        "/data/www/{project}.{role}".to_string(),
    );
    webroots.insert(
        "hiri.dbc.dk".to_string(),
        "/data/www/{project}.{role}.ting.dk".to_string(),
    );
    webroots.insert(
        "halla.dbc.dk".to_string(),
        "/data/www/{project}.{role}.ting.dk".to_string(),
    );
    webroots
}

fn default_log_file() -> PathBuf {
    PathBuf::from("/tmp/deploy.log")
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            roles: default_roles(),
            webroots: default_webroots(),
            log_file: default_log_file(),
        }
    }
}

impl DeployConfig {
    /// Load the registry configuration.
    ///
    /// An explicit path must exist and parse. Without one, `deploy.yaml` in
    /// the working directory is used when present, and the built-in registry
    /// when not. The result is validated eagerly in all cases.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Check required registry keys up front instead of at use time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.webroots.contains_key(DEFAULT_WEBROOT_KEY) {
            return Err(ConfigError::MissingDefaultWebroot);
        }
        for (role, hosts) in &self.roles {
            if hosts.is_empty() {
                return Err(ConfigError::NoHosts { role: role.clone() });
            }
            for entry in hosts {
                HostTarget::parse(entry)?;
            }
        }
        Ok(())
    }

    /// Webroot template for `host`, falling back to the `default` entry.
    pub fn webroot_template(&self, host: &str) -> Result<&str, ConfigError> {
        self.webroots
            .get(host)
            .or_else(|| self.webroots.get(DEFAULT_WEBROOT_KEY))
            .map(String::as_str)
            .ok_or(ConfigError::MissingDefaultWebroot)
    }

    /// Host entries registered for a role selector.
    pub fn hosts_for_role(&self, selector: &str) -> Option<&[String]> {
        self.roles.get(selector).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = DeployConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_file, PathBuf::from("/tmp/deploy.log"));
    }

    #[test]
    fn test_default_registry_entries() {
        let config = DeployConfig::default();
        assert_eq!(
            config.hosts_for_role("dev").unwrap()[0],
            "kkbdeploy@halla.dbc.dk"
        );
        assert_eq!(
            config.hosts_for_role("metropol:stg").unwrap()[0],
            "deploy@haruna.dbc.dk"
        );
        assert!(config.hosts_for_role("unknown").is_none());
    }

    #[test]
    fn test_webroot_template_host_match() {
        let config = DeployConfig::default();
        assert_eq!(
            config.webroot_template("halla.dbc.dk").unwrap(),
            "/data/www/{project}.{role}.ting.dk"
        );
    }

    #[test]
    fn test_webroot_template_default_fallback() {
        let config = DeployConfig::default();
        assert_eq!(
            config.webroot_template("haruna.dbc.dk").unwrap(),
            "/data/www/{project}.{role}"
        );
    }

    #[test]
    fn test_validate_rejects_missing_default_webroot() {
        let mut config = DeployConfig::default();
        config.webroots.remove(DEFAULT_WEBROOT_KEY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDefaultWebroot)
        ));
    }

    #[test]
    fn test_validate_rejects_empty_role() {
        let mut config = DeployConfig::default();
        config.roles.insert("edge".to_string(), vec![]);
        assert!(matches!(config.validate(), Err(ConfigError::NoHosts { .. })));
    }

    #[test]
    fn test_validate_rejects_malformed_host_entry() {
        let mut config = DeployConfig::default();
        config
            .roles
            .insert("edge".to_string(), vec!["nouser.example.org".to_string()]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHostEntry { .. })
        ));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");
        std::fs::write(
            &path,
            "roles:\n  edge: [\"deploy@edge.example.org\"]\nwebroots:\n  default: \"/srv/www/{project}.{role}\"\n",
        )
        .unwrap();

        let config = DeployConfig::load(Some(&path)).unwrap();
        assert_eq!(
            config.hosts_for_role("edge").unwrap()[0],
            "deploy@edge.example.org"
        );
        assert_eq!(
            config.webroot_template("anywhere.example.org").unwrap(),
            "/srv/www/{project}.{role}"
        );
        // Missing sections fall back to built-in defaults.
        assert_eq!(config.log_file, PathBuf::from("/tmp/deploy.log"));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");
        std::fs::write(&path, "roles:\n  edge: [\"no-at-sign\"]\n").unwrap();
        assert!(matches!(
            DeployConfig::load(Some(&path)),
            Err(ConfigError::InvalidHostEntry { .. })
        ));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        assert!(matches!(
            DeployConfig::load(Some(Path::new("/nonexistent/deploy.yaml"))),
            Err(ConfigError::FileRead { .. })
        ));
    }
}
