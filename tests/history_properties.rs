//! End-to-end behaviour of the commit log through the public API.

use snaplog::config::DEFAULT_MAX_HISTORY;
use snaplog::{Author, Commit, CommitLog, FileChange};

fn commit_text(log: &mut CommitLog, path: &str, content: &str, author: Author) -> Commit {
    log.commit(vec![FileChange::new(path, content)], content, author)
}

fn ids(log: &CommitLog) -> Vec<String> {
    log.history().into_iter().map(|c| c.id).collect()
}

#[test]
fn test_linear_truncation() {
    let mut log = CommitLog::new();
    let a = commit_text(&mut log, "a.ts", "A", Author::User);
    commit_text(&mut log, "a.ts", "B", Author::User);
    commit_text(&mut log, "a.ts", "C", Author::User);
    log.undo();
    log.undo();
    let d = commit_text(&mut log, "a.ts", "D", Author::User);

    assert_eq!(ids(&log), vec![a.id, d.id]);
    assert!(!log.can_redo());
}

#[test]
fn test_bounded_history() {
    let mut log = CommitLog::new();
    for i in 0..DEFAULT_MAX_HISTORY + 5 {
        commit_text(&mut log, "a.ts", &i.to_string(), Author::Automated);
    }

    assert_eq!(log.history().len(), DEFAULT_MAX_HISTORY);
    assert_eq!(log.head(), Some(DEFAULT_MAX_HISTORY - 1));
    assert_eq!(log.commits()[0].file_changes[0].content, "5");
}

#[test]
fn test_eviction_keeps_parent_links_of_survivors() {
    let mut log = CommitLog::with_max_history(3);
    let commits: Vec<Commit> = (0..5)
        .map(|i| commit_text(&mut log, "a.ts", &i.to_string(), Author::User))
        .collect();

    // The oldest survivor still names its evicted parent.
    assert_eq!(log.commits()[0].id, commits[2].id);
    assert_eq!(
        log.commits()[0].parent_commit_id.as_deref(),
        Some(commits[1].id.as_str())
    );
    assert!(log.get_commit(&commits[1].id).is_none());
}

#[test]
fn test_undo_redo_round_trip() {
    let mut log = CommitLog::new();
    for (i, path) in ["a.ts", "b.ts", "a.ts", "c.ts"].iter().enumerate() {
        commit_text(&mut log, path, &format!("v{i}"), Author::User);

        let before = log.current_commit().cloned();
        if log.undo().is_some() {
            let after = log.redo().unwrap();
            let before = before.unwrap();
            assert_eq!(after.id, before.id);
            assert_eq!(after.file_changes, before.file_changes);
        }
    }
}

#[test]
fn test_diff_asymmetry() {
    let mut log = CommitLog::new();
    let a = log.commit(
        vec![FileChange::create("x.ts", "1"), FileChange::create("y.ts", "1")],
        "A",
        Author::User,
    );
    let b = log.commit(
        vec![FileChange::modify("y.ts", "2"), FileChange::create("z.ts", "1")],
        "B",
        Author::Automated,
    );
    let c = log.commit(vec![FileChange::modify("x.ts", "1")], "C", Author::User);

    let all = [&a, &b, &c];
    for first in all {
        for second in all {
            let forward = log.compare_commits(&first.id, &second.id);
            let backward = log.compare_commits(&second.id, &first.id);
            assert_eq!(forward.added, backward.deleted);
            assert_eq!(forward.deleted, backward.added);
        }
    }

    let a_c = log.compare_commits(&a.id, &c.id);
    assert!(a_c.modified.is_empty());
    assert_eq!(a_c.deleted, vec!["y.ts"]);
}

#[test]
fn test_serialization_round_trip() {
    let mut log = CommitLog::new();
    commit_text(&mut log, "a.ts", "1", Author::User);
    commit_text(&mut log, "b.ts", "2", Author::Automated);
    commit_text(&mut log, "a.ts", "3", Author::User);
    log.undo();

    let exported = log.export_history().unwrap();
    let mut restored = CommitLog::new();
    assert!(restored.import_history(&exported));

    assert_eq!(restored.history(), log.history());
    assert_eq!(restored.head(), log.head());
    assert_eq!(restored.can_undo(), log.can_undo());
    assert_eq!(restored.can_redo(), log.can_redo());

    // Rehydrated commits behave like the originals.
    let first = log.history()[0].clone();
    assert_eq!(
        restored.file_at_commit("a.ts", &first.id),
        log.file_at_commit("a.ts", &first.id)
    );
    assert_eq!(restored.redo().unwrap().id, log.redo().unwrap().id);
}

#[test]
fn test_round_trip_through_a_file() {
    let mut log = CommitLog::new();
    commit_text(&mut log, "a.ts", "line one\nline two\n", Author::User);
    commit_text(&mut log, "a.ts", "line one\n", Author::Automated);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, log.export_history().unwrap()).unwrap();

    let mut restored = CommitLog::new();
    assert!(restored.import_history(&std::fs::read_to_string(&path).unwrap()));
    assert_eq!(restored.current_diff(), log.current_diff());
    assert_eq!(restored.current_diff().deletions, 1);
}

#[test]
fn test_restore_then_diverge() {
    let mut log = CommitLog::new();
    let a = commit_text(&mut log, "a.ts", "A", Author::User);
    commit_text(&mut log, "a.ts", "B", Author::User);
    commit_text(&mut log, "a.ts", "C", Author::User);

    log.restore_checkpoint(&a.id);
    assert!(log.can_redo());
    assert_eq!(log.len(), 3);

    let d = commit_text(&mut log, "a.ts", "D", Author::User);
    assert_eq!(ids(&log), vec![a.id, d.id]);
}

#[test]
fn test_concrete_scenario() {
    let mut log = CommitLog::new();
    let first = log.commit(vec![FileChange::new("a.ts", "1")], "init", Author::User);
    assert!(!log.can_undo());
    assert_eq!(log.current_commit().unwrap().file_changes[0].content, "1");

    log.commit(vec![FileChange::new("a.ts", "2")], "edit", Author::Automated);
    assert!(log.can_undo());
    assert_eq!(log.undo().unwrap().id, first.id);
    assert_eq!(log.file_at_commit("a.ts", &first.id).unwrap().content, "1");
}

#[test]
fn test_failed_import_keeps_history() {
    let mut log = CommitLog::new();
    commit_text(&mut log, "a.ts", "1", Author::User);
    let before = log.export_history().unwrap();

    let mut truncated = before.clone();
    truncated.truncate(before.len() / 2);
    assert!(!log.import_history(&truncated));
    assert!(!log.import_history(r#"{"commits":[],"head":5}"#));

    assert_eq!(log.export_history().unwrap(), before);
}
