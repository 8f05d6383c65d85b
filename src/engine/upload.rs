//! engine::upload
//!
//! The upload workflow: one local directory becomes one commit on one branch.
//!
//! # Steps
//!
//! 1. Enumerate local files (no remote calls yet, so local problems such as
//!    an empty root or duplicate paths never touch the remote)
//! 2. Optionally create the repository
//! 3. Resolve the branch head and its tree
//! 4. Upload every file as a blob, concurrently, collected in input order
//! 5. Create a tree on top of the head's tree
//! 6. Create a commit whose only parent is the head
//! 7. Move the branch, refusing if it moved since step 3

use futures::stream::{self, StreamExt, TryStreamExt};

use super::objects::ObjectGraphBuilder;
use super::UploadError;
use crate::core::config::{DEFAULT_MESSAGE, DEFAULT_UPLOAD_CONCURRENCY};
use crate::core::source::{FileSource, SourceFile};
use crate::core::types::{
    BlobRef, BranchName, BranchState, CommitRef, FileEntry, FileMode, Oid, RepoPath,
};
use crate::forge::{CreateRepoRequest, Forge, ForgeError, UpdateRefRequest};

/// Settings for one upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Branch to commit onto.
    pub branch: BranchName,
    /// Commit message.
    pub message: String,
    /// Maximum blob uploads in flight. `0` means no limit.
    pub concurrency: usize,
    /// Overwrite the branch even if it moved during the upload.
    pub force: bool,
    /// Create the repository before uploading.
    pub create_repo: Option<CreateRepoRequest>,
}

impl UploadOptions {
    pub fn new(branch: BranchName) -> Self {
        Self {
            branch,
            message: DEFAULT_MESSAGE.to_string(),
            concurrency: DEFAULT_UPLOAD_CONCURRENCY,
            force: false,
            create_repo: None,
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// The branch as it was before the upload.
    pub previous: BranchState,
    /// The new commit the branch now points at.
    pub commit: CommitRef,
    /// Number of files uploaded.
    pub files: usize,
}

/// Drives an upload against a forge.
pub struct Uploader<'a> {
    forge: &'a dyn Forge,
}

impl<'a> Uploader<'a> {
    pub fn new(forge: &'a dyn Forge) -> Self {
        Self { forge }
    }

    fn repo_name(&self) -> String {
        format!("{}/{}", self.forge.owner(), self.forge.repo())
    }

    /// Upload every file from `source` as a single commit on
    /// `options.branch`.
    pub async fn run(
        &self,
        source: &dyn FileSource,
        options: &UploadOptions,
    ) -> Result<UploadOutcome, UploadError> {
        let files = enumerate_files(source)?;
        tracing::info!(files = files.len(), repo = %self.repo_name(), branch = %options.branch, "starting upload");

        if let Some(request) = &options.create_repo {
            self.create_repository(request.clone()).await?;
        }

        let head = self.resolve_branch_head(&options.branch).await?;
        let blobs = self
            .upload_blobs(source, &files, options.concurrency)
            .await?;

        let builder = ObjectGraphBuilder::new(self.forge);
        let (paths, modes): (Vec<RepoPath>, Vec<FileMode>) =
            files.iter().map(|f| (f.path.clone(), f.mode)).unzip();
        let tree = builder
            .build_tree_with_modes(&blobs, &paths, &modes, &head.tree_sha)
            .await?;
        let commit = builder
            .build_commit(&options.message, &tree, &head.commit_sha)
            .await?;

        self.update_branch(&head, &commit.sha, options.force)
            .await?;
        tracing::info!(commit = %commit.sha.short(7), branch = %options.branch, "branch updated");

        Ok(UploadOutcome {
            previous: head,
            commit,
            files: files.len(),
        })
    }

    /// Read the branch's current commit and that commit's tree.
    pub async fn resolve_branch_head(&self, branch: &BranchName) -> Result<BranchState, UploadError> {
        tracing::info!(branch = %branch, "resolving branch head");
        let commit_sha = match self.forge.get_ref(branch).await {
            Ok(sha) => sha,
            Err(ForgeError::NotFound(_)) => {
                return Err(UploadError::RefNotFound {
                    branch: branch.clone(),
                    repo: self.repo_name(),
                })
            }
            Err(e) => return Err(UploadError::remote("get_ref")(e)),
        };
        let tree_sha = self
            .forge
            .get_commit(&commit_sha)
            .await
            .map_err(UploadError::remote("get_commit"))?;
        tracing::debug!(commit = %commit_sha, tree = %tree_sha, "branch head resolved");

        Ok(BranchState {
            branch: branch.clone(),
            commit_sha,
            tree_sha,
        })
    }

    /// Create one blob per file.
    ///
    /// Up to `concurrency` uploads run at once (`0` for no limit). The
    /// returned blobs are in the same order as `files`, whatever order the
    /// uploads complete in. The first failure cancels the uploads still in
    /// flight.
    pub async fn upload_blobs(
        &self,
        source: &dyn FileSource,
        files: &[SourceFile],
        concurrency: usize,
    ) -> Result<Vec<BlobRef>, UploadError> {
        let limit = match concurrency {
            0 => files.len().max(1),
            n => n,
        };
        tracing::info!(files = files.len(), limit, "uploading blobs");

        stream::iter(files)
            .map(|file| self.upload_blob(source, file))
            .buffered(limit)
            .try_collect()
            .await
    }

    async fn upload_blob(
        &self,
        source: &dyn FileSource,
        file: &SourceFile,
    ) -> Result<BlobRef, UploadError> {
        let entry = FileEntry {
            path: file.path.clone(),
            mode: file.mode,
            content: source.read(file).await?,
        };
        let sha = self
            .forge
            .create_blob(&entry.content)
            .await
            .map_err(UploadError::remote("create_blob"))?;
        tracing::debug!(path = %entry.path, bytes = entry.content.len(), blob = %sha.short(7), "blob created");
        Ok(BlobRef { sha })
    }

    /// Point the branch at `commit`.
    ///
    /// Unless `force` is set, the branch must still be at `head.commit_sha`:
    /// it is read again first, and the write itself is only accepted by the
    /// remote as a fast-forward.
    ///
    /// This is not a full compare-and-swap. The REST API has no expected-old-sha
    /// condition, so a reset of the branch to an ancestor of `head` between the
    /// re-read and the write still counts as a fast-forward and is overwritten.
    pub async fn update_branch(
        &self,
        head: &BranchState,
        commit: &Oid,
        force: bool,
    ) -> Result<(), UploadError> {
        let concurrent = |actual| UploadError::ConcurrentUpdate {
            branch: head.branch.clone(),
            expected: head.commit_sha.clone(),
            actual,
        };

        if !force {
            let current = self
                .forge
                .get_ref(&head.branch)
                .await
                .map_err(UploadError::remote("get_ref"))?;
            if current != head.commit_sha {
                tracing::warn!(branch = %head.branch, expected = %head.commit_sha, actual = %current, "branch moved during upload");
                return Err(concurrent(Some(current)));
            }
        }

        tracing::info!(branch = %head.branch, commit = %commit.short(7), force, "updating branch");
        let request = UpdateRefRequest {
            branch: head.branch.clone(),
            sha: commit.clone(),
            force,
        };
        match self.forge.update_ref(request).await {
            Ok(()) => Ok(()),
            Err(ForgeError::Conflict(message)) => {
                tracing::warn!(branch = %head.branch, %message, "branch update rejected");
                Err(concurrent(None))
            }
            Err(e) => Err(UploadError::remote("update_ref")(e)),
        }
    }

    /// Create the forge's repository, initialized with a default branch.
    pub async fn create_repository(&self, request: CreateRepoRequest) -> Result<(), UploadError> {
        tracing::info!(repo = %self.repo_name(), org = request.org, private = request.private, "creating repository");
        self.forge
            .create_repository(request)
            .await
            .map_err(UploadError::remote("create_repository"))
    }
}

/// List the files to upload, rejecting empty and ambiguous sets.
pub fn enumerate_files(source: &dyn FileSource) -> Result<Vec<SourceFile>, UploadError> {
    let files = source.enumerate()?;
    if files.is_empty() {
        return Err(UploadError::NothingToUpload);
    }

    let mut seen = std::collections::HashSet::with_capacity(files.len());
    if let Some(dup) = files.iter().find(|f| !seen.insert(&f.path)) {
        return Err(UploadError::DuplicatePath(dup.path.clone()));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::{MemorySource, SourceError};
    use crate::forge::mock::{FailOn, Interleave, MockForge};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::time::Duration;

    fn main_branch() -> BranchName {
        BranchName::new("main").unwrap()
    }

    fn options() -> UploadOptions {
        UploadOptions {
            message: "Upload".into(),
            ..UploadOptions::new(main_branch())
        }
    }

    /// A source that lists the same path twice.
    struct Duplicated;

    #[async_trait]
    impl FileSource for Duplicated {
        fn enumerate(&self) -> Result<Vec<SourceFile>, SourceError> {
            let file = SourceFile {
                path: RepoPath::new("a.txt").unwrap(),
                mode: FileMode::Regular,
                location: PathBuf::from("a.txt"),
            };
            Ok(vec![file.clone(), file])
        }

        async fn read(&self, _file: &SourceFile) -> Result<Vec<u8>, SourceError> {
            Ok(b"a".to_vec())
        }
    }

    #[tokio::test]
    async fn uploads_files_as_one_commit() {
        let forge = MockForge::seeded("main", &[("keep.txt", "k")]);
        let source = MemorySource::new()
            .file("foo.txt", "hello")
            .file("sub/bar.txt", "world");

        let outcome = Uploader::new(&forge).run(&source, &options()).await.unwrap();

        assert_eq!(outcome.files, 2);
        assert_eq!(forge.head("main"), Some(outcome.commit.sha.clone()));
        let files = forge.branch_files("main").unwrap();
        assert_eq!(files["foo.txt"], MockForge::blob_id("hello"));
        assert_eq!(files["sub/bar.txt"], MockForge::blob_id("world"));
        assert_eq!(files["keep.txt"], MockForge::blob_id("k"));
    }

    #[tokio::test]
    async fn empty_source_fails_before_remote_calls() {
        let forge = MockForge::seeded("main", &[]);
        let err = Uploader::new(&forge)
            .run(&MemorySource::new(), &options())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NothingToUpload));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn duplicate_paths_fail_before_remote_calls() {
        let forge = MockForge::seeded("main", &[]);
        let err = Uploader::new(&forge)
            .run(&Duplicated, &options())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::DuplicatePath(p) if p.as_str() == "a.txt"));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn missing_branch_is_ref_not_found() {
        let forge = MockForge::seeded("main", &[]);
        let err = Uploader::new(&forge)
            .resolve_branch_head(&BranchName::new("gh-pages").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::RefNotFound { branch, .. } if branch.as_str() == "gh-pages"));
    }

    #[tokio::test]
    async fn other_get_ref_failures_are_remote_errors() {
        let forge = MockForge::seeded("main", &[]).fail_on(FailOn::GetRef(ForgeError::RateLimited));
        let err = Uploader::new(&forge)
            .resolve_branch_head(&main_branch())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::RemoteObject {
                operation: "get_ref",
                source: ForgeError::RateLimited
            }
        ));
    }

    #[tokio::test]
    async fn blobs_are_returned_in_input_order() {
        let forge = MockForge::seeded("main", &[])
            .delay_blob("first", Duration::from_millis(50));
        let source = MemorySource::new()
            .file("a", "first")
            .file("b", "second")
            .file("c", "third");
        let files = source.enumerate().unwrap();

        let blobs = Uploader::new(&forge)
            .upload_blobs(&source, &files, 0)
            .await
            .unwrap();

        let expected: Vec<Oid> = ["first", "second", "third"]
            .iter()
            .map(MockForge::blob_id)
            .collect();
        assert_eq!(blobs.into_iter().map(|b| b.sha).collect::<Vec<_>>(), expected);
        assert_eq!(forge.blob_completion_order().last().unwrap(), b"first");
    }

    #[tokio::test]
    async fn concurrency_limit_is_respected() {
        let forge = MockForge::seeded("main", &[]);
        let mut source = MemorySource::new();
        for i in 0..10 {
            source = source.file(&format!("f{}", i), format!("content {}", i));
        }
        let files = source.enumerate().unwrap();

        Uploader::new(&forge)
            .upload_blobs(&source, &files, 3)
            .await
            .unwrap();
        assert!(forge.max_blobs_in_flight() <= 3);
    }

    #[tokio::test]
    async fn unreadable_file_is_local_io_error_and_branch_unchanged() {
        let forge = MockForge::seeded("main", &[]);
        let before = forge.head("main");
        let source = MemorySource::new().file("a", "a").unreadable("b");

        let err = Uploader::new(&forge).run(&source, &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::LocalIo(_)));
        assert_eq!(forge.head("main"), before);
        assert!(!forge.operation_names().contains(&"create_tree"));
    }

    #[tokio::test]
    async fn branch_moved_before_update_is_detected_by_reread() {
        let forge = MockForge::seeded("main", &[("a", "a")])
            .interleave(Interleave::AfterCreateCommit(main_branch()));
        let source = MemorySource::new().file("b", "b");

        let err = Uploader::new(&forge).run(&source, &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::ConcurrentUpdate { actual: Some(_), .. }));
        assert!(!forge.operation_names().contains(&"update_ref"));
    }

    #[tokio::test]
    async fn branch_moved_during_update_is_rejected_by_remote() {
        let forge = MockForge::seeded("main", &[("a", "a")])
            .interleave(Interleave::BeforeUpdateRef(main_branch()));
        let source = MemorySource::new().file("b", "b");

        let err = Uploader::new(&forge).run(&source, &options()).await.unwrap_err();
        assert!(matches!(err, UploadError::ConcurrentUpdate { actual: None, .. }));
    }

    #[tokio::test]
    async fn force_overwrites_moved_branch() {
        let forge = MockForge::seeded("main", &[("a", "a")])
            .interleave(Interleave::AfterCreateCommit(main_branch()));
        let source = MemorySource::new().file("b", "b");
        let options = UploadOptions {
            force: true,
            ..options()
        };

        let outcome = Uploader::new(&forge).run(&source, &options).await.unwrap();
        assert_eq!(forge.head("main"), Some(outcome.commit.sha));
    }

    #[tokio::test]
    async fn create_repo_runs_before_resolving_head() {
        let forge = MockForge::for_repo("octo", "fresh");
        let source = MemorySource::new().file("index.html", "<h1>hi</h1>");
        let options = UploadOptions {
            create_repo: Some(CreateRepoRequest::default()),
            ..options()
        };

        Uploader::new(&forge).run(&source, &options).await.unwrap();
        let names = forge.operation_names();
        assert_eq!(&names[..2], &["create_repository", "get_ref"]);
        assert!(forge.branch_files("main").unwrap().contains_key("index.html"));
    }
}
