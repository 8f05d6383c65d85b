//! dirpush - Upload a local directory to a GitHub branch as a single commit
//!
//! dirpush builds git objects directly through the GitHub REST API: one blob
//! per file, one tree layered on the branch's current tree, one commit, and a
//! single branch update. No local git client or clone is needed.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Enumerate → Resolve → Blobs → Tree → Commit → Ref
//! - [`core`] - Domain types, local file source, and configuration
//! - [`forge`] - Abstraction for the remote git data API (GitHub, mock)
//! - [`auth`] - Access token lookup
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. The uploaded tree pairs every file's path with that file's blob
//! 2. Files not in the upload keep their content on the branch
//! 3. The new commit's only parent is the head observed at the start
//! 4. A branch that moved during the upload is never overwritten silently

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod ui;
