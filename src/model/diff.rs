use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Diff results: structural changes between two commits
// ---------------------------------------------------------------------------

/// Paths that differ between two commits, split by kind of change.
///
/// Not symmetric: comparing `(a, b)` reports as `added` what comparing
/// `(b, a)` reports as `deleted`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDiff {
    /// Paths touched only by the second commit.
    pub added: Vec<String>,
    /// Paths touched by both commits with different content.
    pub modified: Vec<String>,
    /// Paths touched only by the first commit.
    pub deleted: Vec<String>,
}

impl CommitDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Total number of paths that differ.
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }
}

/// Kind of change for one path in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Modified,
    Deleted,
}

impl DiffKind {
    /// Single-character marker used in listings.
    pub fn marker(self) -> char {
        match self {
            DiffKind::Added => 'A',
            DiffKind::Modified => 'M',
            DiffKind::Deleted => 'D',
        }
    }
}

/// Per-file entry of a [`DiffSummary`] with line statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub kind: DiffKind,
    /// Lines present only on the newer side.
    pub additions: usize,
    /// Lines present only on the older side.
    pub deletions: usize,
}

/// Diff between two commits with line counts, as shown in history views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
    pub changes: Vec<FileDiff>,
}

impl DiffSummary {
    /// Build a summary from per-file entries; totals are derived.
    pub fn from_changes(changes: Vec<FileDiff>) -> Self {
        Self {
            files_changed: changes.len(),
            additions: changes.iter().map(|c| c.additions).sum(),
            deletions: changes.iter().map(|c| c.deletions).sum(),
            changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
