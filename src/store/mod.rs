pub mod checkpoint;
pub mod diff;
pub mod index;
pub mod log;
pub mod shared;
pub mod snapshot;

pub use checkpoint::CheckpointSummary;
pub use diff::{diff_commits, line_stats, summarize_commits, unified_diff};
pub use log::CommitLog;
pub use shared::SharedCommitLog;
pub use snapshot::HistorySnapshot;
