//! core
//!
//! Core domain types, local file access, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, BranchName, RepoPath, FileMode, TreeEntry
//! - [`source`] - Local file enumeration and reading
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Enumeration is deterministic

pub mod config;
pub mod source;
pub mod types;
