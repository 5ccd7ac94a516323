use thiserror::Error;

/// Central error type for snaplog operations.
///
/// History navigation never fails: boundary conditions surface as `None` or
/// empty results. These variants cover the few fallible edges (snapshot
/// import, configuration, commit lookup).
#[derive(Error, Debug)]
pub enum SnapError {
    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience type alias for snaplog results.
pub type SnapResult<T> = Result<T, SnapError>;
