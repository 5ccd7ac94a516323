use crate::error::{SnapError, SnapResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default bound on retained commits.
pub const DEFAULT_MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of commits kept; older ones are evicted first.
    pub max_history: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "snaplog=info".to_string(),
            json: false,
        }
    }
}

/// Load configuration. Later sources win: built-in defaults, `snaplog.toml`
/// in the working directory, the explicit `path`, then `SNAPLOG__*`
/// environment variables (e.g. `SNAPLOG__HISTORY__MAX_HISTORY=100`).
pub fn load_config(path: Option<&Path>) -> SnapResult<AppConfig> {
    build_config(path, Environment::with_prefix("SNAPLOG").separator("__"))
}

fn build_config(path: Option<&Path>, env: Environment) -> SnapResult<AppConfig> {
    let history = HistoryConfig::default();
    let logging = LoggingConfig::default();

    let mut builder = Config::builder()
        .set_default("history.max_history", history.max_history as i64)
        .and_then(|b| b.set_default("logging.filter", logging.filter))
        .and_then(|b| b.set_default("logging.json", logging.json))
        .map_err(|err| SnapError::ConfigError(err.to_string()))?
        .add_source(File::with_name("snaplog").required(false));

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }
    builder = builder.add_source(env);

    let config = builder
        .build()
        .map_err(|err| SnapError::ConfigError(err.to_string()))?;

    let parsed: AppConfig = config
        .try_deserialize()
        .map_err(|err| SnapError::ConfigError(err.to_string()))?;

    if parsed.history.max_history == 0 {
        return Err(SnapError::ConfigError(
            "history.max_history must be at least 1".to_string(),
        ));
    }

    Ok(parsed)
}
