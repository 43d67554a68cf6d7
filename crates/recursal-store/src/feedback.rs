//! Feedback Store — append-only JSON-lines log behind an injected client
//!
//! Append is the only mutation: fetch the whole log, add one line, put it
//! back conditionally on the fetched etag. A losing writer re-fetches and
//! retries up to `MAX_APPEND_ATTEMPTS`; exhaustion surfaces as a retryable
//! `ConcurrentModification` with the attempt count, never as a lost update.

use std::sync::Arc;

use recursal_core::types::{FeedbackRecord, FEEDBACK_SCHEMA_VERSION};
use tracing::{debug, warn};

use crate::client::LogClient;
use crate::error::{StoreError, StoreResult};

/// Bound on the optimistic-concurrency append loop.
pub const MAX_APPEND_ATTEMPTS: u32 = 3;

pub struct FeedbackStore {
    client: Arc<dyn LogClient>,
}

impl FeedbackStore {
    /// The store owns no transport of its own — the client is injected once
    /// at process start and shared by reference from there.
    pub fn new(client: Arc<dyn LogClient>) -> Self {
        Self { client }
    }

    /// Append one record. Validates before any I/O; retries version
    /// conflicts with a fresh snapshot each time.
    pub async fn append(&self, record: &FeedbackRecord) -> StoreResult<()> {
        record
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let mut line = serde_json::to_string(record)
            .map_err(|e| StoreError::Validation(format!("unserializable record: {e}")))?;
        line.push('\n');

        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let snapshot = self.client.fetch().await?;
            let mut body = snapshot.body;
            if !body.is_empty() && !body.ends_with(b"\n") {
                body.push(b'\n');
            }
            body.extend_from_slice(line.as_bytes());

            match self.client.put(snapshot.etag.as_deref(), body).await {
                Ok(_) => {
                    debug!(
                        code = %record.finding_code,
                        attempt,
                        "feedback appended"
                    );
                    return Ok(());
                }
                Err(StoreError::VersionConflict) => {
                    warn!(attempt, "feedback log changed under us; retrying append");
                }
                Err(other) => return Err(other),
            }
        }

        Err(StoreError::ConcurrentModification {
            attempts: MAX_APPEND_ATTEMPTS,
        })
    }

    /// Best-effort snapshot of every record, in log order. Malformed lines
    /// and newer-schema records are load errors, not silent skips.
    pub async fn load_all(&self) -> StoreResult<Vec<FeedbackRecord>> {
        let snapshot = self.client.fetch().await?;
        parse_log(&snapshot.body)
    }
}

fn parse_log(body: &[u8]) -> StoreResult<Vec<FeedbackRecord>> {
    let text = String::from_utf8_lossy(body);
    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: FeedbackRecord = serde_json::from_str(line)
            .map_err(|source| StoreError::MalformedEntry { line: i + 1, source })?;
        if record.schema_version > FEEDBACK_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found: record.schema_version,
                supported: FEEDBACK_SCHEMA_VERSION,
            });
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryLogClient;
    use recursal_core::types::{
        FeedbackLabel, FindingCategory, Outcome, ResolvedArgumentSet,
    };

    fn record(code: &str, label: FeedbackLabel, comment: Option<&str>) -> FeedbackRecord {
        FeedbackRecord::now(
            code,
            FindingCategory::SingleChild,
            ResolvedArgumentSet::from(&[2u8][..]),
            Outcome::Procedente,
            label,
            comment.map(String::from),
            "texto do parecer",
        )
    }

    #[tokio::test]
    async fn append_then_load_roundtrip() {
        let store = FeedbackStore::new(Arc::new(MemoryLogClient::new()));
        store
            .append(&record("TC-1", FeedbackLabel::Correct, None))
            .await
            .unwrap();
        store
            .append(&record("TC-2", FeedbackLabel::Incorrect, Some("errou a matriz")))
            .await
            .unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].finding_code, "TC-1");
        assert_eq!(all[1].finding_code, "TC-2");
        assert_eq!(all[1].comment.as_deref(), Some("errou a matriz"));
    }

    #[tokio::test]
    async fn incorrect_without_comment_fails_before_any_write() {
        let client = Arc::new(MemoryLogClient::new());
        let store = FeedbackStore::new(client.clone());

        let err = store
            .append(&record("TC-1", FeedbackLabel::Incorrect, None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store
            .append(&record("TC-1", FeedbackLabel::Incorrect, Some("   ")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Nothing was persisted.
        assert!(client.fetch().await.unwrap().etag.is_none());
    }

    #[tokio::test]
    async fn malformed_line_is_a_load_error() {
        let client = Arc::new(MemoryLogClient::with_body(b"not json\n".to_vec()));
        let store = FeedbackStore::new(client);
        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedEntry { line: 1, .. }));
    }

    #[tokio::test]
    async fn newer_schema_version_is_refused() {
        let mut rec = record("TC-1", FeedbackLabel::Correct, None);
        rec.schema_version = FEEDBACK_SCHEMA_VERSION + 1;
        let line = format!("{}\n", serde_json::to_string(&rec).unwrap());
        let store = FeedbackStore::new(Arc::new(MemoryLogClient::with_body(line.into_bytes())));
        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedSchema { .. }));
    }
}
