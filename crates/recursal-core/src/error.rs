//! Error types for Recursal

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("ambiguous rules for category {category}: priority {priority} matched by more than one rule")]
    AmbiguousRule { category: String, priority: i32 },

    #[error("no decision rule covers category: {0}")]
    UnresolvedCategory(String),

    #[error("concurrent modification of feedback log after {attempts} attempts")]
    ConcurrentModification { attempts: u32 },

    #[error("external collaborator timed out: {0}")]
    CollaboratorTimeout(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("store error: {0}")]
    StoreError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError(reason.into())
    }

    /// Whether the caller may sensibly retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}
