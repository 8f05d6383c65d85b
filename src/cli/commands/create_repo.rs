//! cli::commands::create_repo
//!
//! Create a repository with an initial commit on its default branch.
//!
//! # Example
//!
//! ```bash
//! dirpush create-repo site --owner octocat
//! dirpush create-repo site --owner my-org --org --private --description "Docs"
//! ```

use crate::cli::args::CreateRepoArgs;
use crate::engine::{Context, Uploader};
use crate::forge::{CreateRepoRequest, Forge};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

use super::{github_forge, resolve_owner};

/// Run the create-repo command.
pub fn create_repo(ctx: &Context, args: CreateRepoArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(create_repo_async(ctx, args))
}

async fn create_repo_async(ctx: &Context, args: CreateRepoArgs) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet);
    let owner = resolve_owner(ctx, None, args.owner.as_deref())?;
    let forge = github_forge(ctx, &owner, &args.name)?;

    let request = CreateRepoRequest {
        org: args.org,
        private: args.private,
        description: args.description,
    };
    Uploader::new(&forge)
        .create_repository(request)
        .await
        .with_context(|| format!("cannot create {}/{}", forge.owner(), forge.repo()))?;

    output::print(
        format!("Created repository {}/{}", forge.owner(), forge.repo()),
        verbosity,
    );
    Ok(())
}
