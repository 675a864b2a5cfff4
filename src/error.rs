//! Error types for episode resolution.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the episode resolver.
#[derive(Error, Debug)]
pub enum Error {
    // Resolution errors
    #[error("Resolution cancelled")]
    Cancelled,

    // Bangumi errors
    #[error("Bangumi API error ({status}): {message}")]
    BangumiApi { status: u16, message: String },

    #[error("Bangumi access token invalid. Check BANGUMI_ACCESS_TOKEN or the config file")]
    BangumiAccessTokenInvalid,

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    // Config errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
