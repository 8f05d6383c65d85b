//! core::source
//!
//! Local file enumeration and reading.
//!
//! # Design
//!
//! A [`FileSource`] lists every file under an upload root and reads each
//! file's bytes on demand. Listing is synchronous and deterministic; reading
//! is async so the orchestrator can overlap it with network I/O and only hold
//! the contents of files that are currently being uploaded.
//!
//! [`DirectorySource`] walks the real filesystem. [`MemorySource`] serves
//! fixed contents for tests and dry runs.
//!
//! # Ordering
//!
//! Directory entries are visited depth-first, sorted by file name bytes.
//! The same unchanged directory always yields the same ordered listing, and
//! each relative path depends only on the root and the file's own path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::types::{FileMode, RepoPath, TypeError};

/// Errors from reading the local tree.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    InvalidPath(#[from] TypeError),
}

impl SourceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A file found by enumeration, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the upload root.
    pub path: RepoPath,
    /// Mode to record in the tree.
    pub mode: FileMode,
    /// Where to read the content from.
    pub location: PathBuf,
}

/// Provider of local files for an upload.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// List all files, in a deterministic order.
    fn enumerate(&self) -> Result<Vec<SourceFile>, SourceError>;

    /// Read one file's content.
    async fn read(&self, file: &SourceFile) -> Result<Vec<u8>, SourceError>;
}

/// Options controlling directory enumeration.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Include entries whose name starts with `.` (`.git` is always skipped).
    pub include_hidden: bool,
    /// Record files with an execute bit as `100755` instead of `100644`.
    pub preserve_executable: bool,
}

/// A directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    options: WalkOptions,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: WalkOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self, dir: &Path, out: &mut Vec<SourceFile>) -> Result<(), SourceError> {
        let mut entries = std::fs::read_dir(dir)
            .map_err(|e| SourceError::io(dir, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SourceError::io(dir, e))?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let name = entry.file_name();
            let path = entry.path();
            if name == ".git" || (!self.options.include_hidden && is_hidden(&name)) {
                tracing::debug!(path = %path.display(), "skipping hidden entry");
                continue;
            }

            // symlink_metadata so links are seen as links and not followed
            let meta = std::fs::symlink_metadata(&path).map_err(|e| SourceError::io(&path, e))?;
            let file_type = meta.file_type();
            if file_type.is_symlink() {
                tracing::warn!(path = %path.display(), "skipping symbolic link");
            } else if file_type.is_dir() {
                self.walk(&path, out)?;
            } else if file_type.is_file() {
                let mode = if self.options.preserve_executable && is_executable(&meta) {
                    FileMode::Executable
                } else {
                    FileMode::Regular
                };
                out.push(SourceFile {
                    path: RepoPath::from_relative(&self.root, &path)?,
                    mode,
                    location: path,
                });
            } else {
                tracing::warn!(path = %path.display(), "skipping special file");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FileSource for DirectorySource {
    fn enumerate(&self) -> Result<Vec<SourceFile>, SourceError> {
        let meta = std::fs::metadata(&self.root).map_err(|e| SourceError::io(&self.root, e))?;
        if !meta.is_dir() {
            return Err(SourceError::NotADirectory(self.root.clone()));
        }

        let mut files = Vec::new();
        self.walk(&self.root, &mut files)?;
        Ok(files)
    }

    async fn read(&self, file: &SourceFile) -> Result<Vec<u8>, SourceError> {
        tokio::fs::read(&file.location)
            .await
            .map_err(|e| SourceError::io(&file.location, e))
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    false
}

/// In-memory file source.
///
/// Files are listed in path order. Paths registered with
/// [`MemorySource::unreadable`] enumerate normally but fail on read.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<RepoPath, Option<Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid repository path.
    pub fn file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        let path = RepoPath::new(path).expect("valid repository path");
        self.files.insert(path, Some(content.into()));
        self
    }

    /// Add a file that fails when read.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid repository path.
    pub fn unreadable(mut self, path: &str) -> Self {
        let path = RepoPath::new(path).expect("valid repository path");
        self.files.insert(path, None);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl FileSource for MemorySource {
    fn enumerate(&self) -> Result<Vec<SourceFile>, SourceError> {
        Ok(self
            .files
            .keys()
            .map(|path| SourceFile {
                path: path.clone(),
                mode: FileMode::Regular,
                location: PathBuf::from(path.as_str()),
            })
            .collect())
    }

    async fn read(&self, file: &SourceFile) -> Result<Vec<u8>, SourceError> {
        match self.files.get(&file.path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(SourceError::io(
                &file.location,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            )),
            None => Err(SourceError::io(
                &file.location,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )),
        }
    }
}
