//! Error types for RETRO_OS.

use std::io;

/// Errors produced by the RETRO_OS crates.
#[derive(Debug, thiserror::Error)]
pub enum RetroError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("model API error: {0}")]
    Api(String),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RetroError>;
