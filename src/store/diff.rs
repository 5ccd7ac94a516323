use similar::{ChangeTag, TextDiff};

use crate::model::commit::Commit;
use crate::model::diff::{CommitDiff, DiffKind, DiffSummary, FileDiff};
use crate::store::log::CommitLog;

// ---------------------------------------------------------------------------
// Diff engine: structural comparison of two commits
// ---------------------------------------------------------------------------

/// Compare the file sets of two commits. A path only in `b` is added, only in
/// `a` is deleted, in both with different content is modified. Paths appear
/// in first-seen order: `a`'s order, then `b`'s new paths.
pub fn diff_commits(a: &Commit, b: &Commit) -> CommitDiff {
    let mut diff = CommitDiff::default();

    for old in &a.file_changes {
        match b.file(&old.path) {
            None => diff.deleted.push(old.path.clone()),
            Some(new) if new.content != old.content => diff.modified.push(old.path.clone()),
            Some(_) => {}
        }
    }
    for new in &b.file_changes {
        if !a.touches(&new.path) {
            diff.added.push(new.path.clone());
        }
    }

    diff
}

/// [`diff_commits`] enriched with per-file line counts.
pub fn summarize_commits(a: &Commit, b: &Commit) -> DiffSummary {
    let diff = diff_commits(a, b);
    let mut changes = Vec::with_capacity(diff.len());

    for path in diff.added {
        let additions = b.file(&path).map_or(0, |v| line_count(&v.content));
        changes.push(FileDiff {
            path,
            kind: DiffKind::Added,
            additions,
            deletions: 0,
        });
    }
    for path in diff.modified {
        let old = a.file(&path).map_or("", |v| v.content.as_str());
        let new = b.file(&path).map_or("", |v| v.content.as_str());
        let (additions, deletions) = line_stats(old, new);
        changes.push(FileDiff {
            path,
            kind: DiffKind::Modified,
            additions,
            deletions,
        });
    }
    for path in diff.deleted {
        let deletions = a.file(&path).map_or(0, |v| line_count(&v.content));
        changes.push(FileDiff {
            path,
            kind: DiffKind::Deleted,
            additions: 0,
            deletions,
        });
    }

    DiffSummary::from_changes(changes)
}

/// Count inserted and deleted lines between two texts.
pub fn line_stats(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    let mut additions = 0;
    let mut deletions = 0;

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => additions += 1,
            ChangeTag::Delete => deletions += 1,
            ChangeTag::Equal => {}
        }
    }

    (additions, deletions)
}

/// Render a unified diff of one file between two texts.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

fn line_count(content: &str) -> usize {
    content.lines().count()
}

impl CommitLog {
    /// Compare two commits by ID. Unknown IDs yield an empty diff.
    pub fn compare_commits(&self, id_a: &str, id_b: &str) -> CommitDiff {
        match (self.get_commit(id_a), self.get_commit(id_b)) {
            (Some(a), Some(b)) => diff_commits(a, b),
            _ => CommitDiff::default(),
        }
    }

    /// Line-level summary between two commits by ID. Unknown IDs yield an
    /// empty summary.
    pub fn diff_summary(&self, id_a: &str, id_b: &str) -> DiffSummary {
        match (self.get_commit(id_a), self.get_commit(id_b)) {
            (Some(a), Some(b)) => summarize_commits(a, b),
            _ => DiffSummary::default(),
        }
    }

    /// What the head commit changed relative to the one before it. Zeroed when
    /// head has no predecessor.
    pub fn current_diff(&self) -> DiffSummary {
        match self.head {
            Some(h) if h >= 1 => summarize_commits(&self.commits[h - 1], &self.commits[h]),
            _ => DiffSummary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::file_version::{Author, FileChange};

    #[test]
    fn test_compare_classifies_paths() {
        let mut log = CommitLog::new();
        let a = log.commit(
            vec![
                FileChange::create("keep.ts", "same"),
                FileChange::create("edit.ts", "old"),
                FileChange::create("gone.ts", "x"),
            ],
            "A",
            Author::User,
        );
        let b = log.commit(
            vec![
                FileChange::modify("keep.ts", "same"),
                FileChange::modify("edit.ts", "new"),
                FileChange::create("new.ts", "y"),
            ],
            "B",
            Author::Automated,
        );

        let diff = log.compare_commits(&a.id, &b.id);
        assert_eq!(diff.added, vec!["new.ts"]);
        assert_eq!(diff.modified, vec!["edit.ts"]);
        assert_eq!(diff.deleted, vec!["gone.ts"]);

        let reversed = log.compare_commits(&b.id, &a.id);
        assert_eq!(reversed.added, diff.deleted);
        assert_eq!(reversed.deleted, diff.added);
        assert_eq!(reversed.modified, diff.modified);
    }

    #[test]
    fn test_compare_unknown_ids_is_empty() {
        let mut log = CommitLog::new();
        let a = log.commit(vec![FileChange::create("a.ts", "1")], "A", Author::User);

        assert!(log.compare_commits(&a.id, "c-missing").is_empty());
        assert!(log.compare_commits("c-missing", &a.id).is_empty());
        assert!(log.compare_commits(&a.id, &a.id).is_empty());
    }

    #[test]
    fn test_current_diff_counts_lines() {
        let mut log = CommitLog::new();
        assert_eq!(log.current_diff(), DiffSummary::default());

        log.commit(
            vec![
                FileChange::create("a.ts", "one\ntwo\nthree\n"),
                FileChange::create("b.ts", "b1\nb2\n"),
            ],
            "init",
            Author::User,
        );
        assert_eq!(log.current_diff(), DiffSummary::default());

        log.commit(
            vec![
                FileChange::modify("a.ts", "one\nTWO\nthree\nfour\n"),
                FileChange::create("c.ts", "c1\n"),
            ],
            "edit",
            Author::Automated,
        );

        let summary = log.current_diff();
        assert_eq!(summary.files_changed, 3);
        // a.ts: -two +TWO +four; c.ts: +c1; b.ts: -b1 -b2
        assert_eq!(summary.additions, 2 + 1);
        assert_eq!(summary.deletions, 1 + 2);

        let kinds: Vec<_> = summary.changes.iter().map(|c| (c.path.as_str(), c.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("c.ts", DiffKind::Added),
                ("a.ts", DiffKind::Modified),
                ("b.ts", DiffKind::Deleted),
            ]
        );
    }

    #[test]
    fn test_current_diff_follows_head() {
        let mut log = CommitLog::new();
        log.commit(vec![FileChange::create("a.ts", "1")], "A", Author::User);
        log.commit(vec![FileChange::modify("a.ts", "2")], "B", Author::User);
        assert_eq!(log.current_diff().files_changed, 1);

        log.undo();
        assert!(log.current_diff().is_empty());
    }

    #[test]
    fn test_unified_diff_render() {
        let rendered = unified_diff("a.ts", "one\ntwo\n", "one\n2\n");
        assert!(rendered.contains("--- a/a.ts"));
        assert!(rendered.contains("+++ b/a.ts"));
        assert!(rendered.contains("-two"));
        assert!(rendered.contains("+2"));
    }
}
