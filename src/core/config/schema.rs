//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Example
//!
//! ```toml
//! owner = "my-org"
//! branch = "main"
//! message = "Publish site"
//! api_base = "https://github.example.com/api/v3"
//! upload_concurrency = 16
//! include_hidden = false
//! preserve_executable = true
//! token_env = "MY_GH_TOKEN"
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: the branch must be a valid branch
//! name and the API base must be an http(s) URL.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// Contents of a `config.toml`.
///
/// Every key is optional; unset keys fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Default repository owner (user or organization)
    pub owner: Option<String>,

    /// Default target branch
    pub branch: Option<String>,

    /// Default commit message
    pub message: Option<String>,

    /// REST API base URL (GitHub Enterprise)
    pub api_base: Option<String>,

    /// Maximum blob uploads in flight (0 = unbounded)
    pub upload_concurrency: Option<usize>,

    /// Upload dot-files
    pub include_hidden: Option<bool>,

    /// Record executable files with mode 100755
    pub preserve_executable: Option<bool>,

    /// Environment variable holding the access token
    pub token_env: Option<String>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(branch) = &self.branch {
            BranchName::new(branch.as_str())
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    api_base
                )));
            }
        }

        if let Some(owner) = &self.owner {
            if owner.trim().is_empty() || owner.contains('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid owner '{}'",
                    owner
                )));
            }
        }

        if let Some(var) = &self.token_env {
            if var.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "token_env cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }
}
