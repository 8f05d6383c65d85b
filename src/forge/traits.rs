//! forge::traits
//!
//! Forge trait definition for the git data API of a hosting service.
//!
//! # Design
//!
//! The `Forge` trait is async because every operation is a network call.
//! It exposes only primitive object operations: read a ref, read a commit,
//! create a blob/tree/commit, move a ref, create a repository. Sequencing
//! them into an upload is the engine's job.
//!
//! A forge instance is bound to one `owner/repo` at construction.
//!
//! # Example
//!
//! ```ignore
//! use dirpush::forge::{Forge, ForgeError};
//! use dirpush::core::types::BranchName;
//!
//! async fn head(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let branch = BranchName::new("main").unwrap();
//!     let commit = forge.get_ref(&branch).await?;
//!     let tree = forge.get_commit(&commit).await?;
//!     println!("{} at {} (tree {})", branch, commit, tree);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{BranchName, Oid, TreeEntry};

/// Errors from forge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The token's account cannot create a repository for the bound owner.
    #[error("token belongs to '{authenticated}', not '{owner}'; pass --org to create under an organization")]
    OwnerMismatch {
        authenticated: String,
        owner: String,
    },

    /// The remote rejected a ref update that is not a fast-forward.
    #[error("conflict: {0}")]
    Conflict(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Request to create a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommitRequest {
    pub message: String,
    pub tree: Oid,
    pub parents: Vec<Oid>,
}

/// Request to move a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRefRequest {
    pub branch: BranchName,
    pub sha: Oid,
    /// Allow non-fast-forward updates.
    pub force: bool,
}

/// Request to create the bound repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRepoRequest {
    /// Create under the organization named by the forge's owner instead
    /// of the authenticated user.
    pub org: bool,
    pub private: bool,
    pub description: Option<String>,
}

/// The Forge trait for the git data API of a remote host.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; blob creation is called from many
/// concurrent futures.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Nothing is retried.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Repository owner this forge is bound to.
    fn owner(&self) -> &str;

    /// Repository name this forge is bound to.
    fn repo(&self) -> &str;

    /// Read the commit sha a branch points at.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the branch (or repository) does not exist
    async fn get_ref(&self, branch: &BranchName) -> Result<Oid, ForgeError>;

    /// Read the tree sha of a commit.
    async fn get_commit(&self, sha: &Oid) -> Result<Oid, ForgeError>;

    /// Store `content` as a blob and return its sha.
    async fn create_blob(&self, content: &[u8]) -> Result<Oid, ForgeError>;

    /// Create a tree from `entries` merged into `base_tree`.
    ///
    /// Entries at paths already present in the base tree replace them;
    /// all other base entries are kept.
    ///
    /// # Errors
    ///
    /// - `ApiError` with status 422 if the base tree or an entry sha is invalid
    async fn create_tree(&self, entries: &[TreeEntry], base_tree: &Oid)
        -> Result<Oid, ForgeError>;

    /// Create a commit and return its sha.
    async fn create_commit(&self, request: CreateCommitRequest) -> Result<Oid, ForgeError>;

    /// Point a branch at a commit.
    ///
    /// # Errors
    ///
    /// - `Conflict` if `force` is false and the update is not a fast-forward
    async fn update_ref(&self, request: UpdateRefRequest) -> Result<(), ForgeError>;

    /// Create the repository, initialized with a first commit on its default
    /// branch.
    ///
    /// Without `org`, the repository is created for the authenticated user,
    /// which must be the bound owner.
    ///
    /// # Errors
    ///
    /// - `OwnerMismatch` if `org` is false and the token belongs to another account
    /// - `ApiError` with status 422 if the name is already taken
    async fn create_repository(&self, request: CreateRepoRequest) -> Result<(), ForgeError>;
}
