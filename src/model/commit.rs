use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::file_version::{Author, FileChange, FileVersion};

// ---------------------------------------------------------------------------
// Commit: an immutable, atomic batch of file versions
// ---------------------------------------------------------------------------

/// A commit identifier, unique within the log.
pub type CommitId = String;

/// Generate a new commit ID.
pub fn new_commit_id() -> CommitId {
    format!("c-{}", Uuid::new_v4().as_simple())
}

/// The first `max_chars` characters of an ID. Imported IDs are arbitrary
/// strings, so the cut falls on a character boundary.
pub fn abbreviate_id(id: &str, max_chars: usize) -> &str {
    id.char_indices()
        .nth(max_chars)
        .map_or(id, |(end, _)| &id[..end])
}

/// An ordered batch of file versions recorded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Unique commit identifier.
    pub id: CommitId,
    /// When the commit was created.
    pub timestamp: DateTime<Utc>,
    /// Change description.
    pub message: String,
    /// Who made the change.
    pub author: Author,
    /// Commit that was head when this one was created. Not necessarily the
    /// previous element of the log once older commits have been evicted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_commit_id: Option<CommitId>,
    /// File versions in submission order; paths are unique.
    pub file_changes: Vec<FileVersion>,
}

impl Commit {
    /// Build a commit from a change batch. Every file version gets a fresh ID
    /// and the commit's timestamp. A path submitted twice keeps its first
    /// position and the later content.
    pub fn new(
        changes: Vec<FileChange>,
        message: impl Into<String>,
        author: Author,
        parent_commit_id: Option<CommitId>,
    ) -> Self {
        let timestamp = Utc::now();
        let mut file_changes: Vec<FileVersion> = Vec::with_capacity(changes.len());

        for change in changes {
            let version = FileVersion::from_change(change, author, timestamp);
            match file_changes.iter_mut().find(|v| v.path == version.path) {
                Some(existing) => *existing = version,
                None => file_changes.push(version),
            }
        }

        Self {
            id: new_commit_id(),
            timestamp,
            message: message.into(),
            author,
            parent_commit_id,
            file_changes,
        }
    }

    /// Look up the version of `path` recorded in this commit.
    pub fn file(&self, path: &str) -> Option<&FileVersion> {
        self.file_changes.iter().find(|v| v.path == path)
    }

    /// Returns true if this commit touched `path`.
    pub fn touches(&self, path: &str) -> bool {
        self.file(path).is_some()
    }

    /// Paths touched by this commit, in submission order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.file_changes.iter().map(|v| v.path.as_str())
    }

    /// Short form of the ID for display.
    pub fn short_id(&self) -> &str {
        abbreviate_id(&self.id, 10)
    }
}
