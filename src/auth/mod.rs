//! auth - access tokens for the forge
//!
//! # Design
//!
//! Credentials are an explicit value handed to the forge at construction
//! through a [`TokenProvider`], never read from ambient state by the forge
//! itself. The CLI reads the environment once with [`token_from_env`] and
//! wraps the result in a [`StaticTokenProvider`]; tests pass fake tokens the
//! same way.
//!
//! # Security
//!
//! Tokens must never appear in logs, error messages or `Debug` output.
//! Types in this module implement a redacting `Debug`.
//!
//! # Example
//!
//! ```
//! use dirpush::auth::{token_from_env, StaticTokenProvider, TokenProvider};
//!
//! let lookup = |key: &str| (key == "GITHUB_TOKEN").then(|| "ghp_example123".to_string());
//! let token = token_from_env(&["GITHUB_ACCESS_TOKEN", "GITHUB_TOKEN"], lookup).unwrap();
//! let provider = StaticTokenProvider::new(token);
//! assert!(!format!("{:?}", provider).contains("ghp_example123"));
//! ```

mod errors;

pub use errors::AuthError;

/// Provides bearer tokens to forge adapters.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token for the next request.
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[redacted]")
            .finish()
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

/// Read a token from the first of `vars` that is set and non-empty.
///
/// # Errors
///
/// - [`AuthError::MissingToken`] if none of the variables are set
/// - [`AuthError::InvalidToken`] if the token contains whitespace
pub fn token_from_env(
    vars: &[&str],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, AuthError> {
    for var in vars {
        let Some(value) = lookup(var) else {
            continue;
        };
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        if value.chars().any(char::is_whitespace) {
            return Err(AuthError::InvalidToken {
                var: var.to_string(),
                reason: "contains whitespace".into(),
            });
        }
        return Ok(value);
    }
    Err(AuthError::MissingToken(
        vars.iter().map(|v| v.to_string()).collect(),
    ))
}
