//! LogClient trait — the injected transport under the Feedback Store
//!
//! The backing log is a whole document fetched and replaced atomically,
//! versioned by an opaque etag. `put` is conditional: it succeeds only when
//! the caller holds the current etag, which is what serializes concurrent
//! read-modify-write appends.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};

/// A fetched log document plus its version tag. `etag == None` means the
/// log does not exist yet.
#[derive(Clone, Debug, Default)]
pub struct LogSnapshot {
    pub body: Vec<u8>,
    pub etag: Option<String>,
}

#[async_trait]
pub trait LogClient: Send + Sync {
    /// Best-effort snapshot of the current log.
    async fn fetch(&self) -> StoreResult<LogSnapshot>;

    /// Replace the log, conditional on `expected` matching the stored etag
    /// (`None` = create, must not exist). Returns the new etag on success,
    /// `StoreError::VersionConflict` when someone else wrote first.
    async fn put(&self, expected: Option<&str>, body: Vec<u8>) -> StoreResult<String>;
}

/// In-memory client with real conditional-put semantics. Used in tests and
/// as the reference behavior for other clients.
#[derive(Default)]
pub struct MemoryLogClient {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    body: Option<Vec<u8>>,
    generation: u64,
}

impl MemoryLogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the log with initial content (generation 1).
    pub fn with_body(body: Vec<u8>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                body: Some(body),
                generation: 1,
            }),
        }
    }
}

#[async_trait]
impl LogClient for MemoryLogClient {
    async fn fetch(&self) -> StoreResult<LogSnapshot> {
        let state = self.state.lock().expect("client mutex");
        Ok(match &state.body {
            Some(body) => LogSnapshot {
                body: body.clone(),
                etag: Some(state.generation.to_string()),
            },
            None => LogSnapshot::default(),
        })
    }

    async fn put(&self, expected: Option<&str>, body: Vec<u8>) -> StoreResult<String> {
        let mut state = self.state.lock().expect("client mutex");
        let current = state.body.as_ref().map(|_| state.generation.to_string());
        if expected != current.as_deref() {
            return Err(StoreError::VersionConflict);
        }
        state.body = Some(body);
        state.generation += 1;
        Ok(state.generation.to_string())
    }
}
