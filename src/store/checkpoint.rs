use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::model::commit::{abbreviate_id, Commit, CommitId};
use crate::model::file_version::Author;
use crate::store::log::CommitLog;

// ---------------------------------------------------------------------------
// Checkpoints: jump head to any retained commit
// ---------------------------------------------------------------------------

/// A compact, user-facing view of one commit in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointSummary {
    pub id: CommitId,
    /// Position in the log, oldest first.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub author: Author,
    pub message: String,
    pub file_count: usize,
    pub is_head: bool,
}

impl CheckpointSummary {
    pub fn format_line(&self) -> String {
        let marker = if self.is_head { "*" } else { " " };
        let when = self.timestamp.format("%Y-%m-%d %H:%M:%S");
        format!(
            "{marker} #{index:<3} {id}  {when}  {author:<9}  files:{files}  {message}",
            index = self.index,
            id = abbreviate_id(&self.id, 10),
            author = self.author.as_str(),
            files = self.file_count,
            message = self.message,
        )
    }
}

impl CommitLog {
    /// Move head to the commit with `commit_id`, however far away it is.
    ///
    /// Forward commits are kept: `can_redo()` still sees them until the next
    /// [`CommitLog::commit`] discards them.
    pub fn restore_checkpoint(&mut self, commit_id: &str) -> Option<Commit> {
        let index = self.position(commit_id)?;
        let from = self.head;
        self.head = Some(index);
        debug!(commit_id, ?from, to = index, "Restored checkpoint");
        Some(self.commits[index].clone())
    }

    /// Summaries of every retained commit, oldest first.
    pub fn checkpoints(&self) -> Vec<CheckpointSummary> {
        self.commits
            .iter()
            .enumerate()
            .map(|(index, commit)| CheckpointSummary {
                id: commit.id.clone(),
                index,
                timestamp: commit.timestamp,
                author: commit.author,
                message: commit.message.clone(),
                file_count: commit.file_changes.len(),
                is_head: self.head == Some(index),
            })
            .collect()
    }
}
