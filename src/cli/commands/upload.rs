//! cli::commands::upload
//!
//! Upload a local directory as one commit on a branch.
//!
//! # Example
//!
//! ```bash
//! # Upload ./public to octocat/site on main
//! dirpush upload ./public --repo octocat/site
//!
//! # Different branch and message
//! dirpush upload ./dist --repo octocat/site --branch gh-pages -m "Deploy"
//!
//! # Show what would be uploaded
//! dirpush upload ./public --repo octocat/site --dry-run
//! ```

use crate::cli::args::UploadArgs;
use crate::core::source::{DirectorySource, WalkOptions};
use crate::core::types::BranchName;
use crate::engine::upload::enumerate_files;
use crate::engine::{Context, UploadOptions, Uploader};
use crate::forge::CreateRepoRequest;
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

use super::{github_forge, resolve_owner};

/// Run the upload command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn upload(ctx: &Context, args: UploadArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(upload_async(ctx, args))
}

async fn upload_async(ctx: &Context, args: UploadArgs) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet);
    let config = &ctx.config;

    let owner = resolve_owner(ctx, args.repo.owner.as_deref(), args.owner.as_deref())?;
    let repo = args.repo.name.clone();
    let branch_name = args.branch.as_deref().unwrap_or(config.branch());
    let branch = BranchName::new(branch_name)
        .with_context(|| format!("invalid branch name '{}'", branch_name))?;

    let source = DirectorySource::new(&args.root).with_options(WalkOptions {
        include_hidden: args.include_hidden || config.include_hidden(),
        preserve_executable: args.preserve_executable || config.preserve_executable(),
    });

    if args.dry_run {
        let files = enumerate_files(&source)
            .with_context(|| format!("cannot upload '{}'", args.root.display()))?;
        output::print(
            format!(
                "Would upload {} file(s) to {}/{} on branch {}:",
                files.len(),
                owner,
                repo,
                branch
            ),
            verbosity,
        );
        let entries: Vec<String> = files
            .iter()
            .map(|f| output::format_entry(f.mode, &f.path))
            .collect();
        output::result(output::format_list(&entries, "  "));
        return Ok(());
    }

    let options = UploadOptions {
        branch: branch.clone(),
        message: args
            .message
            .clone()
            .unwrap_or_else(|| config.message().to_string()),
        concurrency: args.concurrency.unwrap_or(config.upload_concurrency()),
        force: args.force,
        create_repo: args.create_repo.then(|| CreateRepoRequest {
            org: args.org,
            private: args.private,
            description: None,
        }),
    };
    if options.force {
        output::warn(
            format!("--force: {} will be overwritten even if it moved", branch),
            verbosity,
        );
    }

    let forge = github_forge(ctx, &owner, &repo)?;
    let outcome = Uploader::new(&forge)
        .run(&source, &options)
        .await
        .with_context(|| format!("upload to {}/{} failed", owner, repo))?;

    output::print(
        format!(
            "Uploaded {} file(s) to {}/{} on branch {}",
            outcome.files, owner, repo, branch
        ),
        verbosity,
    );
    output::result(format!("{} {}", outcome.commit.sha, branch));
    Ok(())
}
