//! auth::errors
//!
//! Authentication error types.
//!
//! Error messages never contain token values.
//!
//! # Example
//!
//! ```
//! use dirpush::auth::AuthError;
//!
//! let err = AuthError::MissingToken(vec!["GITHUB_ACCESS_TOKEN".into()]);
//! assert!(err.to_string().contains("GITHUB_ACCESS_TOKEN"));
//! ```

use thiserror::Error;

/// Errors from obtaining credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// None of the consulted environment variables held a token.
    #[error("no access token found; set one of: {}", .0.join(", "))]
    MissingToken(Vec<String>),

    /// A token was found but is not usable.
    #[error("invalid access token in {var}: {reason}")]
    InvalidToken { var: String, reason: String },
}
