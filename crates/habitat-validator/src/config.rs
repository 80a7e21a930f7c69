//! Validator configuration.
//!
//! Names the service identity and the administrator role. Defaults match
//! the deployed store (`habitat` / `_admin`). Override via environment
//! variables or a YAML file for staging and tests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use habitat_access::{AccessPolicy, DEFAULT_ADMIN_ROLE, DEFAULT_SERVICE_IDENTITY};

/// Environment variable overriding the service identity.
pub const SERVICE_IDENTITY_VAR: &str = "HABITAT_SERVICE_IDENTITY";

/// Environment variable overriding the administrator role.
pub const ADMIN_ROLE_VAR: &str = "HABITAT_ADMIN_ROLE";

/// Identity and role names the validator trusts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Identity of the ingestion service.
    pub service_identity: String,
    /// Role granting administrator rights.
    pub admin_role: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            service_identity: DEFAULT_SERVICE_IDENTITY.to_string(),
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `HABITAT_SERVICE_IDENTITY` (default: `habitat`)
    /// - `HABITAT_ADMIN_ROLE` (default: `_admin`)
    ///
    /// # Errors
    ///
    /// [`ConfigError::Empty`] if a variable is set to an empty string.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_identity: env_name(SERVICE_IDENTITY_VAR, DEFAULT_SERVICE_IDENTITY)?,
            admin_role: env_name(ADMIN_ROLE_VAR, DEFAULT_ADMIN_ROLE)?,
        })
    }

    /// Load configuration from a YAML file. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not a valid configuration, and
    /// [`ConfigError::Empty`] if a name is empty.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.check()?;
        tracing::debug!(path = %path.display(), ?config, "loaded validator configuration");
        Ok(config)
    }

    /// The access policy this configuration describes.
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.service_identity.as_str(), self.admin_role.as_str())
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.service_identity.is_empty() {
            return Err(ConfigError::Empty("service_identity".to_string()));
        }
        if self.admin_role.is_empty() {
            return Err(ConfigError::Empty("admin_role".to_string()));
        }
        Ok(())
    }
}

fn env_name(var: &str, default: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.is_empty() => Err(ConfigError::Empty(var.to_string())),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{0} must not be empty")]
    Empty(String),
}
