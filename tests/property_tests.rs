//! Property-based tests.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::BTreeMap;
use std::time::Duration;

use proptest::prelude::*;
use tempfile::TempDir;

use dirpush::core::source::{DirectorySource, FileSource, MemorySource};
use dirpush::core::types::{BranchName, RepoPath};
use dirpush::engine::{UploadOptions, Uploader};
use dirpush::forge::mock::MockForge;

/// Strategy for one path component made of safe characters.
fn component() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}(\\.[a-z]{1,3})?"
}

/// Strategy for a relative path of one to four components.
fn relative_path() -> impl Strategy<Value = String> {
    prop::collection::vec(component(), 1..4).prop_map(|parts| parts.join("/"))
}

/// Strategy for a set of files where no path is a prefix directory of another.
fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(relative_path(), prop::collection::vec(any::<u8>(), 0..64), 1..12)
        .prop_filter("a path cannot be both a file and a directory", |files| {
            files.keys().all(|a| {
                files
                    .keys()
                    .all(|b| a == b || !b.starts_with(&format!("{}/", a)))
            })
        })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every uploaded path ends up pointing at its own content, whatever
    /// order the blob uploads finish in.
    #[test]
    fn tree_pairs_paths_with_their_blobs(
        files in file_set(),
        delays in prop::collection::vec(0u64..5, 12),
        concurrency in 0usize..6,
    ) {
        prop_assume!(files.keys().all(|p| p != "keep.txt" && !p.starts_with("keep.txt/")));
        let mut forge = MockForge::seeded("main", &[("keep.txt", "kept")]);
        let mut source = MemorySource::new();
        for (i, (path, content)) in files.iter().enumerate() {
            forge = forge.delay_blob(content.clone(), Duration::from_millis(delays[i]));
            source = source.file(path, content.clone());
        }
        let options = UploadOptions {
            concurrency,
            ..UploadOptions::new(BranchName::new("main").unwrap())
        };

        runtime().block_on(async {
            Uploader::new(&forge).run(&source, &options).await.unwrap();
        });

        let tree = forge.branch_files("main").unwrap();
        for (path, content) in &files {
            prop_assert_eq!(&tree[path], &MockForge::blob_id(content));
        }
        prop_assert_eq!(&tree["keep.txt"], &MockForge::blob_id("kept"));
        prop_assert_eq!(tree.len(), files.len() + 1);
    }

    /// Enumerating an unchanged directory twice yields the same ordered paths,
    /// and those paths are exactly the files written.
    #[test]
    fn enumeration_is_deterministic(files in file_set()) {
        let root = TempDir::new().unwrap();
        for (path, content) in &files {
            let full = root.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(&full, content).unwrap();
        }
        let source = DirectorySource::new(root.path());

        let first: Vec<String> = source.enumerate().unwrap().into_iter().map(|f| f.path.to_string()).collect();
        let second: Vec<String> = source.enumerate().unwrap().into_iter().map(|f| f.path.to_string()).collect();
        prop_assert_eq!(&first, &second);

        let mut sorted_expected: Vec<String> = files.keys().cloned().collect();
        let mut sorted_actual = first.clone();
        sorted_expected.sort();
        sorted_actual.sort();
        prop_assert_eq!(sorted_actual, sorted_expected);
    }

    /// Relative paths do not depend on where the root lives.
    #[test]
    fn relative_path_independent_of_root(path in relative_path(), prefix in relative_path()) {
        let a = std::path::Path::new("/srv").join(&prefix);
        let b = std::path::Path::new("/tmp/other");
        let from_a = RepoPath::from_relative(&a, &a.join(&path)).unwrap();
        let from_b = RepoPath::from_relative(b, &b.join(&path)).unwrap();
        prop_assert_eq!(from_a.as_str(), path.as_str());
        prop_assert_eq!(from_a, from_b);
    }

    /// Valid paths are accepted and round-trip through serde as plain strings.
    #[test]
    fn valid_paths_accepted(path in relative_path()) {
        let repo_path = RepoPath::new(path.clone()).unwrap();
        let json = serde_json::to_string(&repo_path).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", path));
    }

    /// Any path with a `..` component is rejected.
    #[test]
    fn parent_components_rejected(before in relative_path(), after in relative_path()) {
        let path = format!("{}/../{}", before, after);
        prop_assert!(RepoPath::new(path).is_err());
    }

    /// Absolute paths are rejected.
    #[test]
    fn absolute_paths_rejected(path in relative_path()) {
        let absolute = format!("/{}", path);
        prop_assert!(RepoPath::new(absolute).is_err());
    }
}
