//! Error types for the GKE catalog provider

use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Main error type for provider operations
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// `refresh` was called before a catalog sink was connected
    #[error("provider is not connected to a catalog sink")]
    NotConnected,

    /// Transport-level failure talking to a remote API
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The GKE API answered with a non-success status
    #[error("GKE API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Access token could not be obtained
    #[error("token error: {0}")]
    Token(String),

    /// The catalog sink rejected a mutation
    #[error("catalog sink error: {0}")]
    Sink(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    pub fn config(msg: &str) -> Self {
        Self::Config(msg.to_string())
    }

    pub fn token(msg: &str) -> Self {
        Self::Token(msg.to_string())
    }

    pub fn sink(msg: &str) -> Self {
        Self::Sink(msg.to_string())
    }

    pub fn serialization(msg: &str) -> Self {
        Self::Serialization(msg.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
