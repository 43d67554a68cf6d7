use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("feedback validation failed: {0}")]
    Validation(String),

    #[error("log version conflict")]
    VersionConflict,

    #[error("concurrent modification persisted across {attempts} attempts")]
    ConcurrentModification { attempts: u32 },

    #[error("store request timed out: {0}")]
    Timeout(String),

    #[error("malformed log entry at line {line}: {source}")]
    MalformedEntry {
        line: usize,
        source: serde_json::Error,
    },

    #[error("unsupported log schema version {found} (max supported {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("http error: {0}")]
    Http(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for recursal_core::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(reason) => recursal_core::Error::Validation(reason),
            StoreError::ConcurrentModification { attempts } => {
                recursal_core::Error::ConcurrentModification { attempts }
            }
            StoreError::Timeout(what) => recursal_core::Error::CollaboratorTimeout(what),
            other => recursal_core::Error::StoreError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
