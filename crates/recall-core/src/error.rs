use thiserror::Error;

use crate::types::BackendKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Embedding generation failed (quota, timeout, bad input).
    #[error("Embedding provider failed: {0}")]
    Provider(String),

    #[error("{backend} backend failed: {message}")]
    Backend { backend: BackendKind, message: String },

    /// The key-value store rejected or could not serve a request.
    #[error("Store unavailable: {0}")]
    Store(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn backend(backend: BackendKind, err: impl std::fmt::Display) -> Self {
        Self::Backend { backend, message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
