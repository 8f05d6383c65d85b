//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock keeps a small content-addressed object store in memory: blobs,
//! trees, commits and branch refs. Object ids are SHA-256 digests of the
//! object's kind and payload, so equal content always gets the same id.
//! Trees are stored flat (full path to entry) and `create_tree` merges the
//! new entries into the base tree the way the real service does.
//!
//! Tests can make any operation fail ([`FailOn`]), delay individual blob
//! uploads to force out-of-order completion, simulate another writer moving
//! the branch ([`Interleave`]), and inspect every call ([`MockOperation`]).
//!
//! # Example
//!
//! ```
//! use dirpush::forge::mock::MockForge;
//! use dirpush::forge::Forge;
//! use dirpush::core::types::BranchName;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::seeded("main", &[("keep.txt", "old")]);
//! let main = BranchName::new("main").unwrap();
//!
//! let head = forge.get_ref(&main).await.unwrap();
//! let tree = forge.get_commit(&head).await.unwrap();
//! assert_eq!(forge.tree(&tree).unwrap().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{CreateCommitRequest, CreateRepoRequest, Forge, ForgeError, UpdateRefRequest};
use crate::core::types::{BranchName, FileMode, ObjectType, Oid, RepoPath, TreeEntry};

/// A flat tree: full path to entry.
pub type MockTree = BTreeMap<RepoPath, TreeEntry>;

/// A stored commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub message: String,
    pub tree: Oid,
    pub parents: Vec<Oid>,
}

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    owner: String,
    repo: String,
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    repo_exists: bool,
    blobs: HashMap<Oid, Vec<u8>>,
    trees: HashMap<Oid, MockTree>,
    commits: HashMap<Oid, MockCommit>,
    refs: HashMap<String, Oid>,
    fail_on: Option<FailOn>,
    interleave: Option<Interleave>,
    blob_delays: HashMap<Vec<u8>, Duration>,
    blobs_in_flight: usize,
    max_blobs_in_flight: usize,
    blob_completions: Vec<Vec<u8>>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    GetRef(ForgeError),
    GetCommit(ForgeError),
    /// Fail every blob upload.
    CreateBlob(ForgeError),
    /// Fail only the upload of this exact content.
    CreateBlobFor { content: Vec<u8>, error: ForgeError },
    CreateTree(ForgeError),
    CreateCommit(ForgeError),
    UpdateRef(ForgeError),
    CreateRepository(ForgeError),
}

/// Another writer moving a branch in the middle of an upload.
#[derive(Debug, Clone)]
pub enum Interleave {
    /// Push a foreign commit right after the upload's commit is created.
    AfterCreateCommit(BranchName),
    /// Push a foreign commit at the start of `update_ref`, before the
    /// update is applied.
    BeforeUpdateRef(BranchName),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetRef {
        branch: String,
    },
    GetCommit {
        sha: Oid,
    },
    CreateBlob {
        content: Vec<u8>,
    },
    CreateTree {
        entries: Vec<TreeEntry>,
        base_tree: Oid,
    },
    CreateCommit {
        message: String,
        tree: Oid,
        parents: Vec<Oid>,
    },
    UpdateRef {
        branch: String,
        sha: Oid,
        force: bool,
    },
    CreateRepository {
        org: bool,
        private: bool,
    },
}

impl MockOperation {
    /// Short operation name, matching the trait method.
    pub fn name(&self) -> &'static str {
        match self {
            MockOperation::GetRef { .. } => "get_ref",
            MockOperation::GetCommit { .. } => "get_commit",
            MockOperation::CreateBlob { .. } => "create_blob",
            MockOperation::CreateTree { .. } => "create_tree",
            MockOperation::CreateCommit { .. } => "create_commit",
            MockOperation::UpdateRef { .. } => "update_ref",
            MockOperation::CreateRepository { .. } => "create_repository",
        }
    }
}

fn digest(kind: &str, payload: &[u8]) -> Oid {
    let mut hasher = Sha256::new();
    hasher.update(format!("{} {}\0", kind, payload.len()).as_bytes());
    hasher.update(payload);
    Oid::new(hex::encode(hasher.finalize())).expect("sha256 hex is a valid oid")
}

fn tree_id(tree: &MockTree) -> Oid {
    let mut payload = Vec::new();
    for entry in tree.values() {
        payload.extend_from_slice(
            format!("{} {} {}\0", entry.mode, entry.path, entry.sha).as_bytes(),
        );
    }
    digest("tree", &payload)
}

fn commit_id(commit: &MockCommit, salt: usize) -> Oid {
    let mut payload = format!("tree {}\n", commit.tree);
    for parent in &commit.parents {
        payload.push_str(&format!("parent {}\n", parent));
    }
    // salt keeps otherwise identical commits distinct, as timestamps would
    payload.push_str(&format!("seq {}\n\n{}", salt, commit.message));
    digest("commit", payload.as_bytes())
}

impl MockForgeInner {
    fn insert_blob(&mut self, content: &[u8]) -> Oid {
        let sha = digest("blob", content);
        self.blobs.insert(sha.clone(), content.to_vec());
        sha
    }

    fn insert_tree(&mut self, tree: MockTree) -> Oid {
        let sha = tree_id(&tree);
        self.trees.insert(sha.clone(), tree);
        sha
    }

    fn insert_commit(&mut self, commit: MockCommit) -> Oid {
        let sha = commit_id(&commit, self.commits.len());
        self.commits.insert(sha.clone(), commit);
        sha
    }

    /// Commit `files` on top of `branch` (or as a root commit).
    fn commit_files(&mut self, branch: &str, files: &[(&str, &[u8])], message: &str) -> Oid {
        let parent = self.refs.get(branch).cloned();
        let mut tree = parent
            .as_ref()
            .and_then(|p| self.commits.get(p))
            .and_then(|c| self.trees.get(&c.tree))
            .cloned()
            .unwrap_or_default();
        for (path, content) in files {
            let path = RepoPath::new(*path).expect("valid repository path");
            let sha = self.insert_blob(content);
            tree.insert(path.clone(), TreeEntry::blob(path, sha));
        }
        let tree = self.insert_tree(tree);
        let sha = self.insert_commit(MockCommit {
            message: message.to_string(),
            tree,
            parents: parent.into_iter().collect(),
        });
        self.refs.insert(branch.to_string(), sha.clone());
        sha
    }

    fn is_ancestor(&self, ancestor: &Oid, descendant: &Oid) -> bool {
        let mut stack = vec![descendant.clone()];
        let mut seen = HashSet::new();
        while let Some(sha) = stack.pop() {
            if &sha == ancestor {
                return true;
            }
            if !seen.insert(sha.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&sha) {
                stack.extend(commit.parents.iter().cloned());
            }
        }
        false
    }

    fn foreign_push(&mut self, branch: &BranchName) {
        let content = format!("pushed by someone else ({})", self.commits.len());
        self.commit_files(
            branch.as_str(),
            &[("CONCURRENT.md", content.as_bytes())],
            "concurrent push",
        );
    }
}

/// Counts one blob upload as in flight until dropped, including when the
/// upload future is cancelled.
struct InFlight<'a>(&'a Mutex<MockForgeInner>);

impl<'a> InFlight<'a> {
    fn start(inner: &'a Mutex<MockForgeInner>) -> Self {
        let mut state = inner.lock().unwrap();
        state.blobs_in_flight += 1;
        state.max_blobs_in_flight = state.max_blobs_in_flight.max(state.blobs_in_flight);
        InFlight(inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.lock() {
            state.blobs_in_flight -= 1;
        }
    }
}

fn unprocessable(message: impl Into<String>) -> ForgeError {
    ForgeError::ApiError {
        status: 422,
        message: message.into(),
    }
}

impl MockForge {
    /// Create a mock bound to `mock/repo` with no repository yet.
    pub fn new() -> Self {
        Self::for_repo("mock", "repo")
    }

    /// Create a mock bound to `owner/repo` with no repository yet.
    pub fn for_repo(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            inner: Arc::new(Mutex::new(MockForgeInner::default())),
        }
    }

    /// Create a mock whose repository exists with one commit on `branch`
    /// containing `files`.
    pub fn seeded(branch: &str, files: &[(&str, &str)]) -> Self {
        let forge = Self::new();
        {
            let mut inner = forge.inner.lock().unwrap();
            inner.repo_exists = true;
            let files: Vec<(&str, &[u8])> =
                files.iter().map(|(p, c)| (*p, c.as_bytes())).collect();
            inner.commit_files(branch, &files, "Initial commit");
        }
        forge
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on = Some(fail_on);
        self
    }

    /// Configure a concurrent writer.
    pub fn interleave(self, interleave: Interleave) -> Self {
        self.inner.lock().unwrap().interleave = Some(interleave);
        self
    }

    /// Delay completion of the blob upload for `content`.
    pub fn delay_blob(self, content: impl Into<Vec<u8>>, delay: Duration) -> Self {
        self.inner
            .lock()
            .unwrap()
            .blob_delays
            .insert(content.into(), delay);
        self
    }

    /// The id a blob with `content` gets.
    pub fn blob_id(content: impl AsRef<[u8]>) -> Oid {
        digest("blob", content.as_ref())
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Names of recorded operations, in call order.
    pub fn operation_names(&self) -> Vec<&'static str> {
        self.operations().iter().map(MockOperation::name).collect()
    }

    /// Blob contents in the order their uploads completed.
    pub fn blob_completion_order(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().blob_completions.clone()
    }

    /// Highest number of blob uploads that were in flight at once.
    pub fn max_blobs_in_flight(&self) -> usize {
        self.inner.lock().unwrap().max_blobs_in_flight
    }

    /// Number of blob uploads in flight right now.
    pub fn blobs_in_flight(&self) -> usize {
        self.inner.lock().unwrap().blobs_in_flight
    }

    /// Current head of a branch.
    pub fn head(&self, branch: &str) -> Option<Oid> {
        self.inner.lock().unwrap().refs.get(branch).cloned()
    }

    /// A stored commit.
    pub fn commit(&self, sha: &Oid) -> Option<MockCommit> {
        self.inner.lock().unwrap().commits.get(sha).cloned()
    }

    /// A stored tree.
    pub fn tree(&self, sha: &Oid) -> Option<MockTree> {
        self.inner.lock().unwrap().trees.get(sha).cloned()
    }

    /// A stored blob's content.
    pub fn blob(&self, sha: &Oid) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().blobs.get(sha).cloned()
    }

    /// Path to blob id for the tree at the head of `branch`.
    pub fn branch_files(&self, branch: &str) -> Option<BTreeMap<String, Oid>> {
        let inner = self.inner.lock().unwrap();
        let head = inner.refs.get(branch)?;
        let commit = inner.commits.get(head)?;
        let tree = inner.trees.get(&commit.tree)?;
        Some(
            tree.values()
                .map(|e| (e.path.to_string(), e.sha.clone()))
                .collect(),
        )
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        self.inner.lock().unwrap().operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, op: &str, content: Option<&[u8]>) -> Option<ForgeError> {
        let inner = self.inner.lock().unwrap();
        match (&inner.fail_on, op) {
            (Some(FailOn::GetRef(e)), "get_ref")
            | (Some(FailOn::GetCommit(e)), "get_commit")
            | (Some(FailOn::CreateBlob(e)), "create_blob")
            | (Some(FailOn::CreateTree(e)), "create_tree")
            | (Some(FailOn::CreateCommit(e)), "create_commit")
            | (Some(FailOn::UpdateRef(e)), "update_ref")
            | (Some(FailOn::CreateRepository(e)), "create_repository") => Some(e.clone()),
            (Some(FailOn::CreateBlobFor { content: c, error }), "create_blob")
                if Some(c.as_slice()) == content =>
            {
                Some(error.clone())
            }
            _ => None,
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn repo(&self) -> &str {
        &self.repo
    }

    async fn get_ref(&self, branch: &BranchName) -> Result<Oid, ForgeError> {
        self.record(MockOperation::GetRef {
            branch: branch.to_string(),
        });
        if let Some(e) = self.check_fail("get_ref", None) {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        if !inner.repo_exists {
            return Err(ForgeError::NotFound("Not Found".into()));
        }
        inner
            .refs
            .get(branch.as_str())
            .cloned()
            .ok_or_else(|| ForgeError::NotFound("Not Found".into()))
    }

    async fn get_commit(&self, sha: &Oid) -> Result<Oid, ForgeError> {
        self.record(MockOperation::GetCommit { sha: sha.clone() });
        if let Some(e) = self.check_fail("get_commit", None) {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .commits
            .get(sha)
            .map(|c| c.tree.clone())
            .ok_or_else(|| ForgeError::NotFound("Not Found".into()))
    }

    async fn create_blob(&self, content: &[u8]) -> Result<Oid, ForgeError> {
        self.record(MockOperation::CreateBlob {
            content: content.to_vec(),
        });
        if let Some(e) = self.check_fail("create_blob", Some(content)) {
            return Err(e);
        }

        let in_flight = InFlight::start(&self.inner);
        let delay = self.inner.lock().unwrap().blob_delays.get(content).copied();

        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let sha = {
            let mut inner = self.inner.lock().unwrap();
            inner.blob_completions.push(content.to_vec());
            inner.insert_blob(content)
        };
        drop(in_flight);
        Ok(sha)
    }

    async fn create_tree(
        &self,
        entries: &[TreeEntry],
        base_tree: &Oid,
    ) -> Result<Oid, ForgeError> {
        self.record(MockOperation::CreateTree {
            entries: entries.to_vec(),
            base_tree: base_tree.clone(),
        });
        if let Some(e) = self.check_fail("create_tree", None) {
            return Err(e);
        }

        let mut inner = self.inner.lock().unwrap();
        let mut tree = inner
            .trees
            .get(base_tree)
            .cloned()
            .ok_or_else(|| unprocessable("tree.base_tree is invalid"))?;
        for entry in entries {
            let known = match entry.kind {
                ObjectType::Blob => inner.blobs.contains_key(&entry.sha),
                ObjectType::Tree => inner.trees.contains_key(&entry.sha),
                ObjectType::Commit => true,
            };
            if !known {
                return Err(unprocessable(format!(
                    "tree.sha {} is not a valid {}",
                    entry.sha, entry.kind
                )));
            }
            if entry.mode == FileMode::Subdirectory {
                return Err(unprocessable("nested trees are not supported by the mock"));
            }
            tree.insert(entry.path.clone(), entry.clone());
        }
        Ok(inner.insert_tree(tree))
    }

    async fn create_commit(&self, request: CreateCommitRequest) -> Result<Oid, ForgeError> {
        self.record(MockOperation::CreateCommit {
            message: request.message.clone(),
            tree: request.tree.clone(),
            parents: request.parents.clone(),
        });
        if let Some(e) = self.check_fail("create_commit", None) {
            return Err(e);
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.trees.contains_key(&request.tree) {
            return Err(unprocessable("Tree SHA does not exist"));
        }
        if let Some(missing) = request
            .parents
            .iter()
            .find(|p| !inner.commits.contains_key(*p))
        {
            return Err(unprocessable(format!("Parent SHA {} does not exist", missing)));
        }
        let sha = inner.insert_commit(MockCommit {
            message: request.message,
            tree: request.tree,
            parents: request.parents,
        });

        if let Some(Interleave::AfterCreateCommit(branch)) = inner.interleave.take() {
            inner.foreign_push(&branch);
        }
        Ok(sha)
    }

    async fn update_ref(&self, request: UpdateRefRequest) -> Result<(), ForgeError> {
        self.record(MockOperation::UpdateRef {
            branch: request.branch.to_string(),
            sha: request.sha.clone(),
            force: request.force,
        });
        if let Some(e) = self.check_fail("update_ref", None) {
            return Err(e);
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(Interleave::BeforeUpdateRef(branch)) = inner.interleave.take() {
            inner.foreign_push(&branch);
        }

        let current = inner
            .refs
            .get(request.branch.as_str())
            .cloned()
            .ok_or_else(|| unprocessable("Reference does not exist"))?;
        if !inner.commits.contains_key(&request.sha) {
            return Err(unprocessable("Object does not exist"));
        }
        if !request.force && !inner.is_ancestor(&current, &request.sha) {
            return Err(ForgeError::Conflict("Update is not a fast forward".into()));
        }
        inner
            .refs
            .insert(request.branch.to_string(), request.sha);
        Ok(())
    }

    async fn create_repository(&self, request: CreateRepoRequest) -> Result<(), ForgeError> {
        self.record(MockOperation::CreateRepository {
            org: request.org,
            private: request.private,
        });
        if let Some(e) = self.check_fail("create_repository", None) {
            return Err(e);
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.repo_exists {
            return Err(unprocessable(
                "Repository creation failed: name already exists on this account",
            ));
        }
        inner.repo_exists = true;
        let readme = format!("# {}\n", self.repo);
        inner.commit_files("main", &[("README.md", readme.as_bytes())], "Initial commit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main() -> BranchName {
        BranchName::new("main").unwrap()
    }

    #[tokio::test]
    async fn empty_mock_has_no_repository() {
        let forge = MockForge::new();
        assert!(matches!(
            forge.get_ref(&main()).await,
            Err(ForgeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn blobs_are_content_addressed() {
        let forge = MockForge::seeded("main", &[]);
        let a = forge.create_blob(b"hello").await.unwrap();
        let b = forge.create_blob(b"hello").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, MockForge::blob_id("hello"));
        assert_eq!(forge.blob(&a), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn create_tree_merges_into_base() {
        let forge = MockForge::seeded("main", &[("keep.txt", "k"), ("a.txt", "old")]);
        let head = forge.get_ref(&main()).await.unwrap();
        let base = forge.get_commit(&head).await.unwrap();

        let new_a = forge.create_blob(b"new").await.unwrap();
        let entries = vec![TreeEntry::blob(RepoPath::new("a.txt").unwrap(), new_a.clone())];
        let tree = forge.create_tree(&entries, &base).await.unwrap();

        let tree = forge.tree(&tree).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[&RepoPath::new("a.txt").unwrap()].sha, new_a);
        assert_eq!(
            tree[&RepoPath::new("keep.txt").unwrap()].sha,
            MockForge::blob_id("k")
        );
    }

    #[tokio::test]
    async fn create_tree_rejects_unknown_base_and_blob() {
        let forge = MockForge::seeded("main", &[]);
        let bogus = Oid::new("1".repeat(40)).unwrap();
        assert!(matches!(
            forge.create_tree(&[], &bogus).await,
            Err(ForgeError::ApiError { status: 422, .. })
        ));

        let head = forge.get_ref(&main()).await.unwrap();
        let base = forge.get_commit(&head).await.unwrap();
        let entries = vec![TreeEntry::blob(RepoPath::new("x").unwrap(), bogus)];
        assert!(forge.create_tree(&entries, &base).await.is_err());
    }

    #[tokio::test]
    async fn update_ref_requires_fast_forward_unless_forced() {
        let forge = MockForge::seeded("main", &[("a.txt", "a")]);
        let head = forge.get_ref(&main()).await.unwrap();
        let tree = forge.get_commit(&head).await.unwrap();

        let orphan = forge
            .create_commit(CreateCommitRequest {
                message: "orphan".into(),
                tree: tree.clone(),
                parents: vec![],
            })
            .await
            .unwrap();

        let result = forge
            .update_ref(UpdateRefRequest {
                branch: main(),
                sha: orphan.clone(),
                force: false,
            })
            .await;
        assert!(matches!(result, Err(ForgeError::Conflict(_))));
        assert_eq!(forge.head("main"), Some(head));

        forge
            .update_ref(UpdateRefRequest {
                branch: main(),
                sha: orphan.clone(),
                force: true,
            })
            .await
            .unwrap();
        assert_eq!(forge.head("main"), Some(orphan));
    }

    #[tokio::test]
    async fn create_repository_initializes_main_once() {
        let forge = MockForge::for_repo("octo", "fresh");
        forge
            .create_repository(CreateRepoRequest::default())
            .await
            .unwrap();
        let files = forge.branch_files("main").unwrap();
        assert!(files.contains_key("README.md"));

        let again = forge.create_repository(CreateRepoRequest::default()).await;
        assert!(matches!(again, Err(ForgeError::ApiError { status: 422, .. })));
    }

    #[tokio::test]
    async fn fail_on_specific_blob() {
        let forge = MockForge::seeded("main", &[]).fail_on(FailOn::CreateBlobFor {
            content: b"bad".to_vec(),
            error: ForgeError::RateLimited,
        });
        assert!(forge.create_blob(b"good").await.is_ok());
        assert_eq!(forge.create_blob(b"bad").await, Err(ForgeError::RateLimited));
    }

    #[tokio::test]
    async fn interleave_before_update_moves_branch() {
        let forge =
            MockForge::seeded("main", &[("a.txt", "a")]).interleave(Interleave::BeforeUpdateRef(main()));
        let head = forge.get_ref(&main()).await.unwrap();
        let tree = forge.get_commit(&head).await.unwrap();
        let child = forge
            .create_commit(CreateCommitRequest {
                message: "child".into(),
                tree,
                parents: vec![head.clone()],
            })
            .await
            .unwrap();

        let result = forge
            .update_ref(UpdateRefRequest {
                branch: main(),
                sha: child,
                force: false,
            })
            .await;
        assert!(matches!(result, Err(ForgeError::Conflict(_))));
        assert_ne!(forge.head("main"), Some(head));
    }

    #[tokio::test]
    async fn cancelled_blob_upload_leaves_flight() {
        let forge = MockForge::seeded("main", &[]).delay_blob("slow", Duration::from_secs(60));

        let cancelled =
            tokio::time::timeout(Duration::from_millis(10), forge.create_blob(b"slow")).await;
        assert!(cancelled.is_err());
        assert_eq!(forge.max_blobs_in_flight(), 1);
        assert_eq!(forge.blobs_in_flight(), 0);
        assert!(forge.blob_completion_order().is_empty());
    }

    #[test]
    fn operation_names_match_trait_methods() {
        let op = MockOperation::UpdateRef {
            branch: "main".into(),
            sha: Oid::new("a".repeat(40)).unwrap(),
            force: false,
        };
        assert_eq!(op.name(), "update_ref");
    }
}
