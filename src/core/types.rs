//! core::types
//!
//! Strong types for the Git object graph built by an upload.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA) returned by the remote
//! - [`BranchName`] - Validated Git branch name
//! - [`RepoPath`] - Relative, `/`-separated path inside a tree
//! - [`FileMode`] / [`ObjectType`] - Tree entry mode and kind
//! - [`TreeEntry`] - A path bound to an object with a mode
//! - [`BlobRef`], [`TreeRef`], [`CommitRef`], [`BranchState`] - Remote objects
//! - [`FileEntry`] - A local file's relative path and content
//!
//! # Validation
//!
//! These types enforce validity at construction time. An invalid mode/type
//! pairing or a path the remote would refuse cannot be represented, so such
//! mistakes are caught before any request is sent.
//!
//! # Examples
//!
//! ```
//! use dirpush::core::types::{BranchName, FileMode, ObjectType, Oid, RepoPath, TreeEntry};
//!
//! let branch = BranchName::new("main").unwrap();
//! assert_eq!(branch.api_ref(), "heads/main");
//!
//! let sha = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let entry = TreeEntry::blob(RepoPath::new("sub/bar.txt").unwrap(), sha);
//! assert_eq!(entry.mode, FileMode::Regular);
//! assert_eq!(entry.kind, ObjectType::Blob);
//!
//! assert!(RepoPath::new("../escape").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid repository path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid file mode: {0}")]
    InvalidMode(String),

    #[error("mode {mode} cannot be used for a {kind} entry")]
    ModeTypeMismatch { mode: FileMode, kind: ObjectType },
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use dirpush::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a 40 or 64
    /// character hex string.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid("object id must be hexadecimal".into()));
        }
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated Git branch name.
///
/// Branch names follow the parts of `git check-ref-format` the hosting
/// service enforces: no empty name, no leading `.`/`-`, no trailing
/// `.lock`/`/`, no `..`, `@{`, `//`, spaces, control characters or any of
/// `~^:\?*[`, and not exactly `@`.
///
/// ```
/// use dirpush::core::types::BranchName;
///
/// assert!(BranchName::new("release/v1").is_ok());
/// assert!(BranchName::new("bad..name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if let Some(reason) = Self::violation(&name) {
            return Err(TypeError::InvalidBranchName(reason));
        }
        Ok(Self(name))
    }

    fn violation(name: &str) -> Option<String> {
        if name.is_empty() {
            return Some("branch name cannot be empty".into());
        }
        if name == "@" {
            return Some("branch name cannot be '@' (reserved)".into());
        }
        for prefix in [".", "-", "/"] {
            if name.starts_with(prefix) {
                return Some(format!("branch name cannot start with '{prefix}'"));
            }
        }
        for suffix in [".lock", "/", "."] {
            if name.ends_with(suffix) {
                return Some(format!("branch name cannot end with '{suffix}'"));
            }
        }
        for seq in ["..", "@{", "//"] {
            if name.contains(seq) {
                return Some(format!("branch name cannot contain '{seq}'"));
            }
        }
        if let Some(c) = name
            .chars()
            .find(|c| matches!(c, ' ' | '~' | '^' | ':' | '\\' | '?' | '*' | '['))
        {
            return Some(format!("branch name cannot contain '{c}'"));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Some("branch name cannot contain control characters".into());
        }
        if name
            .split('/')
            .any(|part| part.starts_with('.') || part.ends_with(".lock"))
        {
            return Some("path component cannot start with '.' or end with '.lock'".into());
        }
        None
    }

    /// The ref path used by the git data API (`heads/<branch>`).
    pub fn api_ref(&self) -> String {
        format!("heads/{}", self.0)
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A path inside a tree, relative to the tree root and `/`-separated.
///
/// ```
/// use dirpush::core::types::RepoPath;
///
/// let p = RepoPath::new("docs/guide.md").unwrap();
/// assert_eq!(p.as_str(), "docs/guide.md");
///
/// assert!(RepoPath::new("").is_err());
/// assert!(RepoPath::new("/etc/passwd").is_err());
/// assert!(RepoPath::new("a//b").is_err());
/// assert!(RepoPath::new(".git/config").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a validated repository path.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        let invalid = |reason: &str| TypeError::InvalidPath {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("path cannot be empty"));
        }
        if path.starts_with('/') {
            return Err(invalid("path must be relative"));
        }
        if path.contains('\\') {
            return Err(invalid("path cannot contain '\\'"));
        }
        if path.contains('\0') {
            return Err(invalid("path cannot contain NUL"));
        }
        for component in path.split('/') {
            match component {
                "" => return Err(invalid("path cannot contain empty components")),
                "." | ".." => return Err(invalid("path cannot contain '.' or '..'")),
                c if c.eq_ignore_ascii_case(".git") => {
                    return Err(invalid("path cannot contain a '.git' component"))
                }
                _ => {}
            }
        }
        Ok(Self(path))
    }

    /// Build a repository path from `path` relative to `root`.
    ///
    /// The result depends only on the two inputs; platform separators are
    /// normalized to `/`.
    pub fn from_relative(root: &Path, path: &Path) -> Result<Self, TypeError> {
        let relative = path.strip_prefix(root).map_err(|_| TypeError::InvalidPath {
            path: path.display().to_string(),
            reason: format!("not under {}", root.display()),
        })?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| TypeError::InvalidPath {
                        path: path.display().to_string(),
                        reason: "path is not valid UTF-8".into(),
                    })?;
                    parts.push(part);
                }
                _ => {
                    return Err(TypeError::InvalidPath {
                        path: path.display().to_string(),
                        reason: "unexpected path component".into(),
                    })
                }
            }
        }
        Self::new(parts.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix-style mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FileMode {
    /// Regular file (`100644`)
    #[default]
    Regular,
    /// Executable file (`100755`)
    Executable,
    /// Subdirectory (`040000`)
    Subdirectory,
    /// Submodule (`160000`)
    Submodule,
    /// Symbolic link (`120000`)
    Symlink,
}

impl FileMode {
    /// The octal string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Subdirectory => "040000",
            FileMode::Submodule => "160000",
            FileMode::Symlink => "120000",
        }
    }

    /// The object type an entry with this mode must point at.
    pub fn object_type(&self) -> ObjectType {
        match self {
            FileMode::Subdirectory => ObjectType::Tree,
            FileMode::Submodule => ObjectType::Commit,
            FileMode::Regular | FileMode::Executable | FileMode::Symlink => ObjectType::Blob,
        }
    }
}

impl std::str::FromStr for FileMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "100644" => Ok(FileMode::Regular),
            "100755" => Ok(FileMode::Executable),
            // the remote reports directories without the leading zero
            "040000" | "40000" => Ok(FileMode::Subdirectory),
            "160000" => Ok(FileMode::Submodule),
            "120000" => Ok(FileMode::Symlink),
            other => Err(TypeError::InvalidMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for FileMode {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FileMode> for String {
    fn from(mode: FileMode) -> Self {
        mode.as_str().to_string()
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Blob => write!(f, "blob"),
            ObjectType::Tree => write!(f, "tree"),
            ObjectType::Commit => write!(f, "commit"),
        }
    }
}

/// A path bound to an object with a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: RepoPath,
    pub mode: FileMode,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub sha: Oid,
}

impl TreeEntry {
    /// Create an entry, rejecting modes that do not fit the object type.
    pub fn new(
        path: RepoPath,
        mode: FileMode,
        kind: ObjectType,
        sha: Oid,
    ) -> Result<Self, TypeError> {
        if mode.object_type() != kind {
            return Err(TypeError::ModeTypeMismatch { mode, kind });
        }
        Ok(Self {
            path,
            mode,
            kind,
            sha,
        })
    }

    /// A regular-file blob entry.
    pub fn blob(path: RepoPath, sha: Oid) -> Self {
        Self {
            path,
            mode: FileMode::Regular,
            kind: ObjectType::Blob,
            sha,
        }
    }
}

/// A blob created on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub sha: Oid,
}

/// A tree created on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRef {
    pub sha: Oid,
}

/// A commit on the remote and the tree it snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: Oid,
    pub tree_sha: Oid,
}

/// The branch head observed at the start of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    pub branch: BranchName,
    pub commit_sha: Oid,
    pub tree_sha: Oid,
}

/// A local file ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: RepoPath,
    pub mode: FileMode,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "abc123def4567890abc123def4567890abc12345";

    mod oid {
        use super::*;

        #[test]
        fn accepts_sha1_and_sha256() {
            assert!(Oid::new(SHA).is_ok());
            assert!(Oid::new("a".repeat(64)).is_ok());
        }

        #[test]
        fn normalizes_to_lowercase() {
            let oid = Oid::new(SHA.to_uppercase()).unwrap();
            assert_eq!(oid.as_str(), SHA);
        }

        #[test]
        fn rejects_bad_length_and_non_hex() {
            assert!(matches!(Oid::new("abc"), Err(TypeError::InvalidOid(_))));
            assert!(Oid::new("g".repeat(40)).is_err());
        }

        #[test]
        fn short_clamps_to_length() {
            let oid = Oid::new(SHA).unwrap();
            assert_eq!(oid.short(7), "abc123d");
            assert_eq!(oid.short(100), SHA);
        }

        #[test]
        fn serde_rejects_invalid() {
            let parsed: Result<Oid, _> = serde_json::from_str("\"nope\"");
            assert!(parsed.is_err());
        }
    }

    mod branch_name {
        use super::*;

        #[test]
        fn valid_names() {
            for name in ["main", "feature/x", "user@topic", "v1.2"] {
                assert!(BranchName::new(name).is_ok(), "{name} should be valid");
            }
        }

        #[test]
        fn invalid_names() {
            for name in [
                "", "@", ".hidden", "-dash", "x.lock", "x/", "a..b", "a@{b", "a//b", "has space",
                "a:b", "a/.b",
            ] {
                assert!(BranchName::new(name).is_err(), "{name:?} should be invalid");
            }
        }

        #[test]
        fn api_ref_uses_heads_prefix() {
            let branch = BranchName::new("release/1").unwrap();
            assert_eq!(branch.api_ref(), "heads/release/1");
        }
    }

    mod repo_path {
        use super::*;
        use std::path::PathBuf;

        #[test]
        fn rejects_traversal_and_empty_components() {
            assert!(RepoPath::new("a/../b").is_err());
            assert!(RepoPath::new("./a").is_err());
            assert!(RepoPath::new("a/").is_err());
            assert!(RepoPath::new("a\\b").is_err());
            assert!(RepoPath::new("sub/.GIT/x").is_err());
        }

        #[test]
        fn from_relative_strips_root() {
            let root = PathBuf::from("/tmp/upload");
            let file = root.join("sub").join("bar.txt");
            let path = RepoPath::from_relative(&root, &file).unwrap();
            assert_eq!(path.as_str(), "sub/bar.txt");
        }

        #[test]
        fn from_relative_outside_root_fails() {
            let root = PathBuf::from("/tmp/upload");
            let file = PathBuf::from("/tmp/other/file.txt");
            assert!(matches!(
                RepoPath::from_relative(&root, &file),
                Err(TypeError::InvalidPath { .. })
            ));
        }

        #[test]
        fn root_itself_is_not_a_path() {
            let root = PathBuf::from("/tmp/upload");
            assert!(RepoPath::from_relative(&root, &root).is_err());
        }
    }

    mod modes {
        use super::*;

        #[test]
        fn wire_strings() {
            assert_eq!(FileMode::Regular.as_str(), "100644");
            assert_eq!(FileMode::Executable.as_str(), "100755");
            assert_eq!(FileMode::Subdirectory.as_str(), "040000");
            assert_eq!(FileMode::Submodule.as_str(), "160000");
            assert_eq!(FileMode::Symlink.as_str(), "120000");
        }

        #[test]
        fn parses_short_directory_mode() {
            assert_eq!("40000".parse::<FileMode>(), Ok(FileMode::Subdirectory));
            assert!("100600".parse::<FileMode>().is_err());
        }

        #[test]
        fn tree_entry_serializes_for_the_api() {
            let entry = TreeEntry::blob(RepoPath::new("a.txt").unwrap(), Oid::new(SHA).unwrap());
            let json = serde_json::to_value(&entry).unwrap();
            assert_eq!(
                json,
                serde_json::json!({
                    "path": "a.txt",
                    "mode": "100644",
                    "type": "blob",
                    "sha": SHA,
                })
            );
        }

        #[test]
        fn tree_entry_rejects_mismatched_mode() {
            let err = TreeEntry::new(
                RepoPath::new("dir").unwrap(),
                FileMode::Subdirectory,
                ObjectType::Blob,
                Oid::new(SHA).unwrap(),
            )
            .unwrap_err();
            assert_eq!(
                err,
                TypeError::ModeTypeMismatch {
                    mode: FileMode::Subdirectory,
                    kind: ObjectType::Blob,
                }
            );
        }

        #[test]
        fn executable_entry_is_a_blob() {
            let entry = TreeEntry::new(
                RepoPath::new("run.sh").unwrap(),
                FileMode::Executable,
                ObjectType::Blob,
                Oid::new(SHA).unwrap(),
            );
            assert!(entry.is_ok());
        }
    }
}
