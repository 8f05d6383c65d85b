//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Results meant for the user go through this module and respect `--quiet`.
//! Diagnostics go through `tracing` instead.

pub mod output;
