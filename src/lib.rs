pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use config::{AppConfig, HistoryConfig, LoggingConfig};
pub use error::{SnapError, SnapResult};
pub use model::*;
pub use store::{CheckpointSummary, CommitLog, HistorySnapshot, SharedCommitLog};
