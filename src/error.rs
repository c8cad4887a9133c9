// src/error.rs

//! Unified error handling for the collector.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A remote lookup did not produce a usable payload
    #[error("Request to {url} failed with status {status}")]
    Fetch { url: String, status: String },

    /// A record file does not end in a closed JSON array
    #[error("Corrupt record store {path}: {message}")]
    CorruptStore { path: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a URL and a status code or failure tag.
    pub fn fetch(url: impl Into<String>, status: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            status: status.to_string(),
        }
    }

    /// Create a corrupt store error for a file.
    pub fn corrupt(path: &Path, message: impl fmt::Display) -> Self {
        Self::CorruptStore {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
