//! Error handling and custom error types
//!
//! Every failure of a backend exchange collapses into one user-facing message;
//! the variants here keep the cause around for logging.

use thiserror::Error;

/// Shown when a failed request carries no server-supplied detail.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Server-supplied detail, if the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// The single line shown to the user for a failed request.
    pub fn user_message(&self) -> String {
        self.detail()
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
