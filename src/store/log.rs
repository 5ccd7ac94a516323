use tracing::{debug, info};

use crate::config::{HistoryConfig, DEFAULT_MAX_HISTORY};
use crate::model::commit::Commit;
use crate::model::file_version::{Author, FileChange};

// ---------------------------------------------------------------------------
// CommitLog: linear history with a movable head
// ---------------------------------------------------------------------------

/// Ordered, bounded, strictly linear commit history.
///
/// ## Invariants
/// - `head` is `None` iff `commits` is empty; otherwise it indexes the commit
///   the caller is viewing.
/// - Committing while `head` is behind the tail discards the forward commits
///   first, so history never forks.
/// - `commits.len() <= max_history`; overflow evicts from the front and shifts
///   `head` so it keeps designating the same commit.
///
/// Every mutation happens inside one `&mut self` call, so no caller can
/// observe a half-truncated or half-evicted log.
#[derive(Debug, Clone)]
pub struct CommitLog {
    pub(crate) commits: Vec<Commit>,
    pub(crate) head: Option<usize>,
    pub(crate) max_history: usize,
}

impl CommitLog {
    /// Create an empty log holding at most 50 commits.
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    /// Create an empty log with a custom bound (at least one commit is kept).
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            commits: Vec::new(),
            head: None,
            max_history: max_history.max(1),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::with_max_history(config.max_history)
    }

    /// Record a batch of file changes as a new commit and move head onto it.
    pub fn commit(
        &mut self,
        changes: Vec<FileChange>,
        message: impl Into<String>,
        author: Author,
    ) -> Commit {
        let keep = self.head.map_or(0, |h| h + 1);
        if keep < self.commits.len() {
            let discarded = self.commits.len() - keep;
            self.commits.truncate(keep);
            debug!(discarded, "Discarded redo branch");
        }

        let parent = self.current_commit().map(|c| c.id.clone());
        let commit = Commit::new(changes, message, author, parent);
        self.commits.push(commit.clone());
        self.head = Some(self.commits.len() - 1);

        let evicted = self.evict_overflow();
        debug!(
            commit_id = %commit.id,
            files = commit.file_changes.len(),
            evicted,
            "Recorded commit"
        );

        commit
    }

    /// Step head back by one. Returns the new current commit, or `None` if
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<Commit> {
        if !self.can_undo() {
            return None;
        }
        let head = self.head? - 1;
        self.head = Some(head);
        debug!(head, "Undo");
        self.commits.get(head).cloned()
    }

    /// Step head forward by one. Returns the new current commit, or `None` if
    /// head is already at the tail.
    pub fn redo(&mut self) -> Option<Commit> {
        if !self.can_redo() {
            return None;
        }
        let head = self.head? + 1;
        self.head = Some(head);
        debug!(head, "Redo");
        self.commits.get(head).cloned()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.head, Some(h) if h > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.head, Some(h) if h + 1 < self.commits.len())
    }

    /// The commit head points at, if any.
    pub fn current_commit(&self) -> Option<&Commit> {
        self.head.and_then(|h| self.commits.get(h))
    }

    /// Owned copy of the full history, oldest first.
    pub fn history(&self) -> Vec<Commit> {
        self.commits.clone()
    }

    /// Borrowed view of the full history, oldest first.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Look up a retained commit by ID.
    pub fn get_commit(&self, commit_id: &str) -> Option<&Commit> {
        self.position(commit_id).map(|i| &self.commits[i])
    }

    /// Drop every commit and reset head.
    pub fn clear_history(&mut self) {
        let cleared = self.commits.len();
        self.commits.clear();
        self.head = None;
        info!(cleared, "Cleared history");
    }

    /// Index of head, `None` when the log is empty.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub(crate) fn position(&self, commit_id: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.id == commit_id)
    }

    /// Evict the oldest commits beyond `max_history`, keeping head on the same
    /// commit (or the oldest survivor). Returns the number evicted.
    pub(crate) fn evict_overflow(&mut self) -> usize {
        let overflow = self.commits.len().saturating_sub(self.max_history);
        if overflow == 0 {
            return 0;
        }
        self.commits.drain(..overflow);
        self.head = self.head.map(|h| h.saturating_sub(overflow));
        overflow
    }
}

impl Default for CommitLog {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
