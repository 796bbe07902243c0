//! Error types for catalog-core
//!
//! Every failure is terminal for the request that hit it; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for catalog operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Storage Errors
    // ===================
    #[error("Failed to read item store: {path}")]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse item store {path}: {message}")]
    StorageParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write item store: {path}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize items: {0}")]
    Serialize(#[source] serde_json::Error),

    // ===================
    // Request Errors
    // ===================
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Item not found")]
    NotFound { id: String },
}

impl CoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(id: impl ToString) -> Self {
        CoreError::NotFound { id: id.to_string() }
    }

    /// True for failures of the backing file rather than of the request
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            CoreError::StorageRead { .. }
                | CoreError::StorageParse { .. }
                | CoreError::StorageWrite { .. }
                | CoreError::Serialize(_)
        )
    }
}
