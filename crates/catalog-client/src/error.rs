//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The fetch was superseded or the browser shut down
    #[error("Request cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
