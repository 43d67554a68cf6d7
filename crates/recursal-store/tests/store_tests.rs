//! Store-level tests: concurrent appends, retry exhaustion, retrieval flow.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use recursal_store::{
    retrieve, FeedbackStore, LogClient, LogSnapshot, MemoryLogClient, StoreError, StoreResult,
    MAX_APPEND_ATTEMPTS,
};

use recursal_core::types::{
    FeedbackLabel, FeedbackRecord, FindingCategory, Outcome, ResolvedArgumentSet,
};

fn record(code: &str, label: FeedbackLabel) -> FeedbackRecord {
    FeedbackRecord::now(
        code,
        FindingCategory::ChildAddress,
        ResolvedArgumentSet::from(&[2u8, 4][..]),
        Outcome::Procedente,
        label,
        match label {
            FeedbackLabel::Correct => None,
            FeedbackLabel::Incorrect => Some("parecer citou regra errada".into()),
        },
        "texto gerado",
    )
}

/// Client that injects a competing write between fetch and put for the
/// first `contended` append attempts, simulating a concurrent session.
struct ContendedClient {
    inner: MemoryLogClient,
    remaining: AtomicU32,
}

impl ContendedClient {
    fn new(contended: u32) -> Self {
        Self {
            inner: MemoryLogClient::new(),
            remaining: AtomicU32::new(contended),
        }
    }
}

#[async_trait]
impl LogClient for ContendedClient {
    async fn fetch(&self) -> StoreResult<LogSnapshot> {
        self.inner.fetch().await
    }

    async fn put(&self, expected: Option<&str>, body: Vec<u8>) -> StoreResult<String> {
        if self.remaining.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            // Another session lands its append first.
            let snapshot = self.inner.fetch().await?;
            let mut competing = snapshot.body;
            competing.extend_from_slice(
                format!("{}\n", serde_json::to_string(&record("RIVAL", FeedbackLabel::Correct)).unwrap())
                    .as_bytes(),
            );
            self.inner.put(snapshot.etag.as_deref(), competing).await?;
        }
        self.inner.put(expected, body).await
    }
}

#[tokio::test]
async fn conflicting_append_retries_and_both_records_survive() {
    let client = Arc::new(ContendedClient::new(1));
    let store = FeedbackStore::new(client);

    store
        .append(&record("TC-9", FeedbackLabel::Correct))
        .await
        .expect("append should succeed on retry");

    let all = store.load_all().await.unwrap();
    let codes: Vec<&str> = all.iter().map(|r| r.finding_code.as_str()).collect();
    assert_eq!(all.len(), 2, "no lost update");
    assert!(codes.contains(&"RIVAL"));
    assert!(codes.contains(&"TC-9"));
}

#[tokio::test]
async fn persistent_contention_exhausts_the_retry_bound() {
    // Every attempt loses the race.
    let client = Arc::new(ContendedClient::new(u32::MAX));
    let store = FeedbackStore::new(client);

    let err = store
        .append(&record("TC-9", FeedbackLabel::Correct))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConcurrentModification {
            attempts: MAX_APPEND_ATTEMPTS
        }
    ));
}

#[tokio::test]
async fn two_sequential_sessions_share_one_log() {
    let client = Arc::new(MemoryLogClient::new());
    let session_a = FeedbackStore::new(client.clone());
    let session_b = FeedbackStore::new(client.clone());

    session_a
        .append(&record("TC-1", FeedbackLabel::Correct))
        .await
        .unwrap();
    session_b
        .append(&record("TC-2", FeedbackLabel::Incorrect))
        .await
        .unwrap();

    assert_eq!(session_a.load_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn retrieve_returns_latest_matching_exemplar() {
    let client = Arc::new(MemoryLogClient::new());
    let store = FeedbackStore::new(client);

    store.append(&record("OLD", FeedbackLabel::Correct)).await.unwrap();
    store.append(&record("BAD", FeedbackLabel::Incorrect)).await.unwrap();
    store.append(&record("NEW", FeedbackLabel::Correct)).await.unwrap();

    let exemplar = retrieve(&store, FindingCategory::ChildAddress, Outcome::Procedente)
        .await
        .unwrap()
        .expect("an approved exemplar exists");
    assert_eq!(exemplar.finding_code, "NEW");

    let none = retrieve(&store, FindingCategory::InssPension, Outcome::Procedente)
        .await
        .unwrap();
    assert!(none.is_none());
}
