use std::collections::{BTreeMap, BTreeSet};

use crate::model::file_version::FileVersion;
use crate::store::log::CommitLog;

// ---------------------------------------------------------------------------
// File history index: per-path views derived from the commit log
// ---------------------------------------------------------------------------

impl CommitLog {
    /// Every recorded version of `path`, most recent first. Consecutive
    /// entries may carry identical content.
    pub fn file_history(&self, path: &str) -> Vec<FileVersion> {
        self.commits
            .iter()
            .rev()
            .filter_map(|commit| commit.file(path).cloned())
            .collect()
    }

    /// The version of `path` recorded in commit `commit_id`. `None` when the
    /// commit is unknown or did not touch the path.
    pub fn file_at_commit(&self, path: &str, commit_id: &str) -> Option<FileVersion> {
        self.get_commit(commit_id)?.file(path).cloned()
    }

    /// The latest version of `path` recorded at or before `commit_id`.
    /// `None` if the commit is unknown, the path was never recorded in the
    /// retained history up to that point, or its latest record is a deletion.
    pub fn resolve_file(&self, path: &str, commit_id: &str) -> Option<FileVersion> {
        let end = self.position(commit_id)?;
        let latest = self.commits[..=end]
            .iter()
            .rev()
            .find_map(|commit| commit.file(path))?;

        if latest.is_deletion() {
            None
        } else {
            Some(latest.clone())
        }
    }

    /// The project tree visible at `commit_id`, replayed from the oldest
    /// retained commit. Deleted paths are absent.
    pub fn tree_at(&self, commit_id: &str) -> Option<BTreeMap<String, FileVersion>> {
        let end = self.position(commit_id)?;
        let mut tree = BTreeMap::new();

        for commit in &self.commits[..=end] {
            for version in &commit.file_changes {
                if version.is_deletion() {
                    tree.remove(&version.path);
                } else {
                    tree.insert(version.path.clone(), version.clone());
                }
            }
        }

        Some(tree)
    }

    /// Every path touched by a retained commit.
    pub fn tracked_paths(&self) -> BTreeSet<String> {
        self.commits
            .iter()
            .flat_map(|commit| commit.paths().map(str::to_string))
            .collect()
    }
}
