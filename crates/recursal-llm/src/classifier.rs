//! Classifier trait — the external text-classification collaborator
//!
//! The classifier reads the TCU extract and the defense text and proposes a
//! finding label plus argument candidates. Its output is advisory: every
//! candidate goes through the deterministic pattern validator downstream,
//! so the decision path stays reproducible without a live model.

use recursal_core::types::{ArgumentCandidate, FindingCategory};
use tokio_util::sync::CancellationToken;

/// Result type for classifier operations
pub type ClassifierResult<T> = Result<T, ClassifierError>;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("cancelled")]
    Cancelled,

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl From<ClassifierError> for recursal_core::Error {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Timeout(what) => recursal_core::Error::CollaboratorTimeout(what),
            other => recursal_core::Error::Validation(format!("classifier failure: {other}")),
        }
    }
}

/// What the collaborator proposes for one case.
#[derive(Clone, Debug)]
pub struct Classification {
    pub category: FindingCategory,
    pub candidates: Vec<ArgumentCandidate>,
    /// Free-form argument names outside the 12-entry catalog ("boa-fé",
    /// "segurança jurídica", ...). Reported to the operator, never decided
    /// on.
    pub unmapped: Vec<String>,
}

/// Inputs handed to the collaborator.
#[derive(Clone, Debug)]
pub struct ClassifyRequest {
    /// Text of the TCU extract describing the finding.
    pub extract_text: String,
    /// Full text of the defense/appeal.
    pub defense_text: String,
}

/// External classifier boundary.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Classify one case. If `cancel` is provided and triggered, the
    /// underlying request is dropped and `ClassifierError::Cancelled` is
    /// returned.
    async fn classify(
        &self,
        request: ClassifyRequest,
        cancel: Option<CancellationToken>,
    ) -> ClassifierResult<Classification>;
}
