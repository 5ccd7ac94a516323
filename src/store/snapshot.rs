use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::{SnapError, SnapResult};
use crate::model::commit::Commit;
use crate::store::log::CommitLog;

// ---------------------------------------------------------------------------
// Serialization: whole-history export and import
// ---------------------------------------------------------------------------

/// Wire form of a commit log: `{ "commits": [...], "head": <int> }`.
///
/// `head` is `-1` for an empty history. Timestamps are RFC 3339 strings with
/// full sub-second precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub commits: Vec<Commit>,
    pub head: i64,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    commits: &'a [Commit],
    head: i64,
}

impl HistorySnapshot {
    /// Parse and shape-check a serialized history.
    pub fn parse(serialized: &str) -> SnapResult<Self> {
        let snapshot: HistorySnapshot = serde_json::from_str(serialized)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the invariants a live log relies on.
    pub fn validate(&self) -> SnapResult<()> {
        let len = self.commits.len() as i64;
        if self.commits.is_empty() && self.head != -1 {
            return Err(SnapError::InvalidSnapshot(format!(
                "head {} in an empty history (expected -1)",
                self.head
            )));
        }
        if !self.commits.is_empty() && !(0..len).contains(&self.head) {
            return Err(SnapError::InvalidSnapshot(format!(
                "head {} out of range for {} commits",
                self.head, len
            )));
        }

        let mut commit_ids = HashSet::new();
        let mut version_ids = HashSet::new();
        for commit in &self.commits {
            if !commit_ids.insert(commit.id.as_str()) {
                return Err(SnapError::InvalidSnapshot(format!(
                    "duplicate commit id {}",
                    commit.id
                )));
            }

            let mut paths = HashSet::new();
            for version in &commit.file_changes {
                if !paths.insert(version.path.as_str()) {
                    return Err(SnapError::InvalidSnapshot(format!(
                        "path {} appears twice in commit {}",
                        version.path, commit.id
                    )));
                }
                if !version_ids.insert(version.id.as_str()) {
                    return Err(SnapError::InvalidSnapshot(format!(
                        "duplicate file version id {}",
                        version.id
                    )));
                }
            }
        }

        Ok(())
    }
}

impl CommitLog {
    /// Serialize the commits and head to a JSON string.
    pub fn export_history(&self) -> SnapResult<String> {
        let snapshot = SnapshotRef {
            commits: &self.commits,
            head: self.head_index(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replace the in-memory state with a serialized history.
    ///
    /// Returns `false` and leaves the current state untouched if the input is
    /// malformed.
    pub fn import_history(&mut self, serialized: &str) -> bool {
        match self.try_import_history(serialized) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Rejected history import");
                false
            }
        }
    }

    /// Like [`CommitLog::import_history`], but reports why an import failed.
    /// Returns the number of commits retained.
    ///
    /// A history longer than `max_history` is trimmed from the front the same
    /// way [`CommitLog::commit`] evicts.
    pub fn try_import_history(&mut self, serialized: &str) -> SnapResult<usize> {
        let snapshot = HistorySnapshot::parse(serialized)?;

        let mut next = CommitLog::with_max_history(self.max_history);
        next.head = usize::try_from(snapshot.head).ok();
        next.commits = snapshot.commits;
        let evicted = next.evict_overflow();

        *self = next;
        info!(commits = self.commits.len(), head = ?self.head, evicted, "Imported history");
        Ok(self.commits.len())
    }

    /// Head as the wire integer: `-1` when empty.
    pub fn head_index(&self) -> i64 {
        self.head.map_or(-1, |h| h as i64)
    }
}
