//! Error types for loading feeds and configuration
//!
//! Reconciliation itself never fails; these only cover the edges where
//! documents and config files are read.

use thiserror::Error;

/// Result type for player-rankings operations that can fail
pub type Result<T> = std::result::Result<T, RankingsError>;

#[derive(Error, Debug)]
pub enum RankingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed '{feed}' is not a JSON array")]
    NotAList { feed: String },
}
