use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::commit::Commit;
use crate::model::diff::{CommitDiff, DiffSummary};
use crate::model::file_version::{Author, FileChange, FileVersion};
use crate::store::log::CommitLog;

// ---------------------------------------------------------------------------
// SharedCommitLog: a lock-guarded handle for multi-task hosts
// ---------------------------------------------------------------------------

/// Cloneable handle to one [`CommitLog`] behind a single `RwLock`.
///
/// Each mutating call holds the write lock for the whole operation; reads
/// hold the read lock and hand back owned values.
#[derive(Clone, Default)]
pub struct SharedCommitLog {
    inner: Arc<RwLock<CommitLog>>,
}

impl SharedCommitLog {
    pub fn new(log: CommitLog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(log)),
        }
    }

    pub async fn commit(
        &self,
        changes: Vec<FileChange>,
        message: impl Into<String>,
        author: Author,
    ) -> Commit {
        self.inner.write().await.commit(changes, message, author)
    }

    pub async fn undo(&self) -> Option<Commit> {
        self.inner.write().await.undo()
    }

    pub async fn redo(&self) -> Option<Commit> {
        self.inner.write().await.redo()
    }

    pub async fn restore_checkpoint(&self, commit_id: &str) -> Option<Commit> {
        self.inner.write().await.restore_checkpoint(commit_id)
    }

    pub async fn clear_history(&self) {
        self.inner.write().await.clear_history();
    }

    pub async fn import_history(&self, serialized: &str) -> bool {
        self.inner.write().await.import_history(serialized)
    }

    pub async fn can_undo(&self) -> bool {
        self.inner.read().await.can_undo()
    }

    pub async fn can_redo(&self) -> bool {
        self.inner.read().await.can_redo()
    }

    pub async fn current_commit(&self) -> Option<Commit> {
        self.inner.read().await.current_commit().cloned()
    }

    pub async fn history(&self) -> Vec<Commit> {
        self.inner.read().await.history()
    }

    pub async fn file_history(&self, path: &str) -> Vec<FileVersion> {
        self.inner.read().await.file_history(path)
    }

    pub async fn file_at_commit(&self, path: &str, commit_id: &str) -> Option<FileVersion> {
        self.inner.read().await.file_at_commit(path, commit_id)
    }

    pub async fn compare_commits(&self, id_a: &str, id_b: &str) -> CommitDiff {
        self.inner.read().await.compare_commits(id_a, id_b)
    }

    pub async fn current_diff(&self) -> DiffSummary {
        self.inner.read().await.current_diff()
    }

    pub async fn export_history(&self) -> crate::error::SnapResult<String> {
        self.inner.read().await.export_history()
    }

    /// Clone of the whole log taken under the read lock.
    pub async fn snapshot(&self) -> CommitLog {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_one_log() {
        let shared = SharedCommitLog::new(CommitLog::new());
        let other = shared.clone();

        shared
            .commit(vec![FileChange::create("a.ts", "1")], "init", Author::User)
            .await;
        let second = other
            .commit(vec![FileChange::modify("a.ts", "2")], "edit", Author::Automated)
            .await;

        assert_eq!(shared.history().await.len(), 2);
        assert!(shared.can_undo().await);
        assert_eq!(other.current_commit().await.unwrap().id, second.id);
    }

    #[tokio::test]
    async fn test_concurrent_commits_are_serialized() {
        let shared = SharedCommitLog::new(CommitLog::with_max_history(100));

        let mut handles = Vec::new();
        for i in 0..20 {
            let log = shared.clone();
            handles.push(tokio::spawn(async move {
                log.commit(
                    vec![FileChange::new(format!("f{i}.ts"), i.to_string())],
                    format!("task {i}"),
                    Author::Automated,
                )
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.len(), 20);
        assert_eq!(snapshot.head(), Some(19));
        for pair in snapshot.commits().windows(2) {
            assert_eq!(pair[1].parent_commit_id.as_deref(), Some(pair[0].id.as_str()));
        }
    }

    #[tokio::test]
    async fn test_undo_and_diff_through_handle() {
        let shared = SharedCommitLog::default();
        let first = shared
            .commit(vec![FileChange::create("a.ts", "1")], "init", Author::User)
            .await;
        shared
            .commit(vec![FileChange::modify("a.ts", "2")], "edit", Author::User)
            .await;

        assert_eq!(shared.current_diff().await.files_changed, 1);
        assert_eq!(shared.undo().await.unwrap().id, first.id);
        assert!(shared.can_redo().await);
        assert_eq!(
            shared.file_at_commit("a.ts", &first.id).await.unwrap().content,
            "1"
        );
    }
}
