//! engine
//!
//! Builds one commit from a local directory and moves a branch to it.
//!
//! # Architecture
//!
//! ```text
//! Enumerate -> Resolve head -> Upload blobs -> Build tree -> Build commit -> Update ref
//! ```
//!
//! Each step consumes the previous step's output, so steps run strictly in
//! order. Only blob uploads run concurrently, and their results are collected
//! by position so that blob *i* is always paired with file *i*.
//!
//! - [`objects`]: [`ObjectGraphBuilder`] turns blobs and paths into a tree,
//!   and a tree plus parent into a commit.
//! - [`upload`]: [`Uploader`] sequences the whole workflow.
//!
//! # Invariants
//!
//! - No tree, commit or ref call is made unless every blob upload succeeded
//! - The new commit has exactly one parent: the head observed at the start
//! - The branch is written once, at the end, and only if it still points at
//!   that head (unless forced)
//! - Nothing is retried; any failure aborts the upload. Objects created
//!   before the failure stay unreferenced on the remote.

pub mod objects;
pub mod upload;

pub use objects::ObjectGraphBuilder;
pub use upload::{UploadOptions, UploadOutcome, Uploader};

use thiserror::Error;

use crate::core::config::Config;
use crate::core::source::SourceError;
use crate::core::types::{BranchName, Oid, RepoPath};
use crate::forge::ForgeError;

/// Errors from an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The local root or one of its files could not be read.
    #[error("local I/O error: {0}")]
    LocalIo(#[from] SourceError),

    /// The target branch does not exist on the remote.
    #[error("branch '{branch}' not found in {repo}; create the repository or branch first")]
    RefNotFound { branch: BranchName, repo: String },

    /// A remote call failed.
    #[error("{operation} failed: {source}")]
    RemoteObject {
        operation: &'static str,
        #[source]
        source: ForgeError,
    },

    /// The branch moved between reading its head and updating it.
    #[error(
        "branch '{branch}' was updated concurrently (expected {expected}, found {})",
        .actual.as_ref().map(|a| a.to_string()).unwrap_or_else(|| "a newer commit".into())
    )]
    ConcurrentUpdate {
        branch: BranchName,
        expected: Oid,
        actual: Option<Oid>,
    },

    /// Two files map to the same tree path.
    #[error("duplicate path in upload: {0}")]
    DuplicatePath(RepoPath),

    /// The local root contains no files.
    #[error("nothing to upload: no files found")]
    NothingToUpload,

    /// Inputs that cannot form a valid object graph.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl UploadError {
    pub(crate) fn remote(operation: &'static str) -> impl FnOnce(ForgeError) -> UploadError {
        move |source| UploadError::RemoteObject { operation, source }
    }
}

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags and the config file.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Loaded configuration.
    pub config: Config,
}
