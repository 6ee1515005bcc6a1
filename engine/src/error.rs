//! Error types for the fallible edges of the crate: loading configuration
//! and replaying recorded sessions. Builder operations themselves never fail.

use std::path::PathBuf;

use thiserror::Error;

/// An error loading or validating a [`ToolConfig`](crate::config::ToolConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config value \"{field}\" must be {expected}; got {got}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
        got: f32,
    },
}

/// An error loading or replaying a recorded tool session.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Could not read recording \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid recording JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error:\n\t{0}")]
    Config(#[from] ConfigError),
}
