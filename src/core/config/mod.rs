//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (applied by the CLI layer, not here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. An explicit `--config <path>` (must exist)
//! 2. `$DIRPUSH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/dirpush/config.toml`
//! 4. `~/.dirpush/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use dirpush::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//! println!("Branch: {}", config.branch());
//! println!("API: {}", config.api_base());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default target branch.
pub const DEFAULT_BRANCH: &str = "main";

/// Default commit message.
pub const DEFAULT_MESSAGE: &str = "Upload files";

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default number of concurrent blob uploads.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// Environment variables consulted for the access token, in order.
pub const DEFAULT_TOKEN_ENVS: [&str; 2] = ["GITHUB_ACCESS_TOKEN", "GITHUB_TOKEN"];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// The file it came from, if any.
    pub path: Option<PathBuf>,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: FileConfig,
}

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// validated, or if `explicit` is given and missing. Absent default
    /// files are not an error.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load configuration using the given environment lookup and home dir.
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let path = match explicit {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::Missing(path.to_path_buf())),
            None => Self::search(&env, home),
        };

        let file = match &path {
            Some(path) => Self::read(path)?,
            None => FileConfig::default(),
        };
        file.validate()?;

        if let Some(path) = &path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(ConfigLoadResult {
            config: Config { file },
            path,
        })
    }

    fn search(env: &impl Fn(&str) -> Option<String>, home: Option<PathBuf>) -> Option<PathBuf> {
        let candidates = [
            env("DIRPUSH_CONFIG").map(PathBuf::from),
            env("XDG_CONFIG_HOME").map(|xdg| PathBuf::from(xdg).join("dirpush/config.toml")),
            home.map(|h| h.join(".dirpush/config.toml")),
        ];
        candidates.into_iter().flatten().find(|p| p.exists())
    }

    fn read(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    pub fn owner(&self) -> Option<&str> {
        self.file.owner.as_deref()
    }

    /// Target branch. Defaults to "main".
    pub fn branch(&self) -> &str {
        self.file.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Commit message. Defaults to "Upload files".
    pub fn message(&self) -> &str {
        self.file.message.as_deref().unwrap_or(DEFAULT_MESSAGE)
    }

    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn upload_concurrency(&self) -> usize {
        self.file
            .upload_concurrency
            .unwrap_or(DEFAULT_UPLOAD_CONCURRENCY)
    }

    pub fn include_hidden(&self) -> bool {
        self.file.include_hidden.unwrap_or(false)
    }

    pub fn preserve_executable(&self) -> bool {
        self.file.preserve_executable.unwrap_or(false)
    }

    /// Environment variables to read the token from, in order.
    pub fn token_envs(&self) -> Vec<&str> {
        match &self.file.token_env {
            Some(var) => vec![var.as_str()],
            None => DEFAULT_TOKEN_ENVS.to_vec(),
        }
    }
}
