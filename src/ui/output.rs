//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Results go
//! to stdout; warnings and errors go to stderr.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a result line.
///
/// Always shown, so scripts running with `--quiet` still get the outcome.
pub fn result(message: impl Display) {
    println!("{}", message);
}

/// Format a planned tree entry as `<mode> <path>`.
pub fn format_entry(mode: impl Display, path: impl Display) -> String {
    format!("{} {}", mode, path)
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FileMode, RepoPath};

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false), Verbosity::Normal);
    }

    #[test]
    fn entry_formatting() {
        assert_eq!(format_entry(FileMode::Regular, "a/b.txt"), "100644 a/b.txt");
        assert_eq!(
            format_entry(FileMode::Executable, RepoPath::new("bin/run").unwrap()),
            "100755 bin/run"
        );
    }

    #[test]
    fn list_formatting() {
        assert_eq!(format_list(&["a", "b"], "  "), "  a\n  b");
        assert_eq!(format_list::<&str>(&[], "  "), "");
    }
}
