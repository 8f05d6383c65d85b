//! forge
//!
//! Abstraction over the remote hosting service's git data API.
//!
//! # Architecture
//!
//! The [`Forge`] trait exposes the primitive object operations an upload
//! needs (read ref, read commit, create blob/tree/commit, update ref, create
//! repository). The engine sequences them; forges never call each other.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: In-memory object store for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use dirpush::forge::{Forge, github::GitHubForge};
//! use dirpush::auth::StaticTokenProvider;
//! use std::sync::Arc;
//!
//! let forge = GitHubForge::new(Arc::new(StaticTokenProvider::new(token)), "octocat", "site");
//! let blob = forge.create_blob(b"hello").await?;
//! println!("created blob {}", blob);
//! ```

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
