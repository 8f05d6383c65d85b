//! engine::objects
//!
//! Construction of the tree and commit objects for an upload.
//!
//! The builder does no I/O of its own beyond the two creation calls it
//! makes on the forge. Merging new entries into the base tree is left to
//! the remote: entries at existing paths replace them, everything else in
//! the base tree is kept.

use std::collections::HashSet;

use super::UploadError;
use crate::core::types::{BlobRef, CommitRef, FileMode, Oid, RepoPath, TreeEntry, TreeRef};
use crate::forge::{CreateCommitRequest, Forge};

/// Builds tree and commit objects on a forge.
pub struct ObjectGraphBuilder<'a> {
    forge: &'a dyn Forge,
}

impl<'a> ObjectGraphBuilder<'a> {
    pub fn new(forge: &'a dyn Forge) -> Self {
        Self { forge }
    }

    /// Pair `blobs[i]` with `paths[i]` as regular files and create a tree on
    /// top of `base_tree`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the two sequences differ in length
    /// - `DuplicatePath` if a path appears twice
    /// - `RemoteObject` if the remote rejects the tree
    pub async fn build_tree(
        &self,
        blobs: &[BlobRef],
        paths: &[RepoPath],
        base_tree: &Oid,
    ) -> Result<TreeRef, UploadError> {
        let modes = vec![FileMode::Regular; paths.len()];
        self.build_tree_with_modes(blobs, paths, &modes, base_tree)
            .await
    }

    /// Like [`build_tree`](Self::build_tree) with an explicit mode per path.
    pub async fn build_tree_with_modes(
        &self,
        blobs: &[BlobRef],
        paths: &[RepoPath],
        modes: &[FileMode],
        base_tree: &Oid,
    ) -> Result<TreeRef, UploadError> {
        let entries = tree_entries(blobs, paths, modes)?;
        tracing::info!(entries = entries.len(), base_tree = %base_tree.short(7), "creating tree");

        let sha = self
            .forge
            .create_tree(&entries, base_tree)
            .await
            .map_err(UploadError::remote("create_tree"))?;
        Ok(TreeRef { sha })
    }

    /// Create a commit of `tree` with `parent` as its only parent.
    pub async fn build_commit(
        &self,
        message: &str,
        tree: &TreeRef,
        parent: &Oid,
    ) -> Result<CommitRef, UploadError> {
        if message.trim().is_empty() {
            return Err(UploadError::InvalidInput(
                "commit message cannot be empty".into(),
            ));
        }
        tracing::info!(tree = %tree.sha.short(7), parent = %parent.short(7), "creating commit");

        let sha = self
            .forge
            .create_commit(CreateCommitRequest {
                message: message.to_string(),
                tree: tree.sha.clone(),
                parents: vec![parent.clone()],
            })
            .await
            .map_err(UploadError::remote("create_commit"))?;
        Ok(CommitRef {
            sha,
            tree_sha: tree.sha.clone(),
        })
    }
}

/// Positional pairing of blobs, paths and modes into tree entries.
fn tree_entries(
    blobs: &[BlobRef],
    paths: &[RepoPath],
    modes: &[FileMode],
) -> Result<Vec<TreeEntry>, UploadError> {
    if blobs.len() != paths.len() || modes.len() != paths.len() {
        return Err(UploadError::InvalidInput(format!(
            "{} blobs, {} paths and {} modes cannot be paired",
            blobs.len(),
            paths.len(),
            modes.len()
        )));
    }

    let mut seen = HashSet::with_capacity(paths.len());
    blobs
        .iter()
        .zip(paths)
        .zip(modes)
        .map(|((blob, path), mode)| {
            if !seen.insert(path) {
                return Err(UploadError::DuplicatePath(path.clone()));
            }
            TreeEntry::new(path.clone(), *mode, mode.object_type(), blob.sha.clone())
                .map_err(|e| UploadError::InvalidInput(e.to_string()))
        })
        .collect()
}
