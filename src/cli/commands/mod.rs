//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves settings from flags and configuration
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Commands talk to the network and are async. Each handler builds a tokio
//! runtime and blocks on its async implementation.

mod create_repo;
mod upload;

pub use create_repo::create_repo;
pub use upload::upload;

use std::sync::Arc;

use crate::auth::{self, StaticTokenProvider};
use crate::cli::args::Command;
use crate::engine::Context;
use crate::forge::github::GitHubForge;
use anyhow::{anyhow, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Upload(args) => upload::upload(ctx, args),
        Command::CreateRepo(args) => create_repo::create_repo(ctx, args),
    }
}

/// Pick the repository owner: explicit value, then `--owner`, then config.
pub(crate) fn resolve_owner(
    ctx: &Context,
    explicit: Option<&str>,
    flag: Option<&str>,
) -> Result<String> {
    if let (Some(explicit), Some(flag)) = (explicit, flag) {
        if explicit != flag {
            return Err(anyhow!(
                "conflicting owners: '{}' from --repo and '{}' from --owner",
                explicit,
                flag
            ));
        }
    }
    explicit
        .or(flag)
        .or(ctx.config.owner())
        .map(String::from)
        .ok_or_else(|| {
            anyhow!("no repository owner; use --repo <owner>/<name>, --owner, or set `owner` in the config file")
        })
}

/// Build an authenticated GitHub forge for `owner/repo`.
///
/// The token is read once from the environment here and handed to the
/// forge; nothing else reads it.
pub(crate) fn github_forge(ctx: &Context, owner: &str, repo: &str) -> Result<GitHubForge> {
    let token = auth::token_from_env(&ctx.config.token_envs(), |var| std::env::var(var).ok())?;
    Ok(GitHubForge::with_api_base(
        Arc::new(StaticTokenProvider::new(token)),
        owner,
        repo,
        ctx.config.api_base(),
    ))
}
