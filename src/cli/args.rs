//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--config <path>`: Read configuration from this file

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dirpush - Upload a local directory to a GitHub branch as a single commit
#[derive(Parser, Debug)]
#[command(name = "dirpush")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: $DIRPUSH_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a directory as one commit on a branch
    #[command(
        long_about = "Upload every file under a directory as a single commit on a branch.\n\n\
            Files are added on top of the branch's current tree: files at the same path \
            are replaced, everything else on the branch is kept. The branch is only moved \
            if nobody else moved it during the upload, unless --force is given.",
        after_help = "\
EXAMPLES:
    # Publish a built site to the main branch
    dirpush upload ./public --repo octocat/site

    # Preview what would be uploaded
    dirpush upload ./public --repo octocat/site --dry-run

    # Create the repository first, then upload
    dirpush upload ./public --repo octocat/site --create-repo --private"
    )]
    Upload(UploadArgs),

    /// Create a repository with an initial commit
    #[command(name = "create-repo")]
    CreateRepo(CreateRepoArgs),
}

/// Arguments for `upload`.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Directory whose files are uploaded
    pub root: PathBuf,

    /// Target repository as `owner/name`, or `name` with --owner or a configured owner
    #[arg(long, value_parser = parse_repo_spec)]
    pub repo: RepoSpec,

    /// Repository owner (user or organization)
    #[arg(long)]
    pub owner: Option<String>,

    /// Branch to commit onto
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Maximum concurrent blob uploads (0 for no limit)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Include files and directories whose name starts with '.'
    #[arg(long)]
    pub include_hidden: bool,

    /// Record executable files with mode 100755
    #[arg(long)]
    pub preserve_executable: bool,

    /// Create the repository before uploading
    #[arg(long)]
    pub create_repo: bool,

    /// Create the repository under an organization
    #[arg(long, requires = "create_repo")]
    pub org: bool,

    /// Create the repository as private
    #[arg(long, requires = "create_repo")]
    pub private: bool,

    /// Move the branch even if it changed during the upload
    #[arg(long)]
    pub force: bool,

    /// List the files that would be uploaded without contacting the remote
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `create-repo`.
#[derive(Args, Debug)]
pub struct CreateRepoArgs {
    /// Repository name
    pub name: String,

    /// Repository owner (user or organization)
    #[arg(long)]
    pub owner: Option<String>,

    /// Create under the organization given by --owner
    #[arg(long)]
    pub org: bool,

    /// Create as private
    #[arg(long)]
    pub private: bool,

    /// Repository description
    #[arg(long)]
    pub description: Option<String>,
}

/// A repository given as `owner/name` or `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub owner: Option<String>,
    pub name: String,
}

/// Parse `owner/name` or `name`.
pub fn parse_repo_spec(value: &str) -> Result<RepoSpec, String> {
    let (owner, name) = match value.split_once('/') {
        Some((owner, name)) => (Some(owner), name),
        None => (None, value),
    };

    let valid = |part: &str| {
        !part.is_empty()
            && part != "."
            && part != ".."
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };

    if let Some(owner) = owner {
        if !valid(owner) {
            return Err(format!("invalid owner '{}'", owner));
        }
    }
    if !valid(name) {
        return Err(format!("invalid repository name '{}'", name));
    }

    Ok(RepoSpec {
        owner: owner.map(String::from),
        name: name.to_string(),
    })
}
