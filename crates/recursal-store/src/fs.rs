//! Filesystem-backed log client
//!
//! For single-machine use. The etag is a generation counter kept in a
//! sidecar file next to the log; conditional put compares and bumps it
//! while holding an exclusive OS file lock, so two processes appending to
//! the same log serialize at the compare-and-swap the same way concurrent
//! sessions do against the HTTP client.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::client::{LogClient, LogSnapshot};
use crate::error::{StoreError, StoreResult};

pub struct FsLogClient {
    log_path: PathBuf,
    etag_path: PathBuf,
    lock_path: PathBuf,
}

impl FsLogClient {
    pub fn new(log_path: impl AsRef<Path>) -> Self {
        let log_path = log_path.as_ref().to_path_buf();
        let etag_path = log_path.with_extension("etag");
        let lock_path = log_path.with_extension("lock");
        Self {
            log_path,
            etag_path,
            lock_path,
        }
    }

    /// Exclusive advisory lock over the read-compare-write window. The lock
    /// is held by the returned handle and released when it drops.
    fn exclusive_lock(&self) -> StoreResult<fs::File> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        file.lock()?;
        Ok(file)
    }

    fn read_etag(&self) -> Option<String> {
        fs::read_to_string(&self.etag_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
impl LogClient for FsLogClient {
    async fn fetch(&self) -> StoreResult<LogSnapshot> {
        let _lock = self.exclusive_lock()?;
        if !self.log_path.exists() {
            return Ok(LogSnapshot::default());
        }
        Ok(LogSnapshot {
            body: fs::read(&self.log_path)?,
            etag: self.read_etag().or_else(|| Some("0".into())),
        })
    }

    async fn put(&self, expected: Option<&str>, body: Vec<u8>) -> StoreResult<String> {
        let _lock = self.exclusive_lock()?;
        let current = if self.log_path.exists() {
            self.read_etag().or_else(|| Some("0".into()))
        } else {
            None
        };
        if expected != current.as_deref() {
            return Err(StoreError::VersionConflict);
        }

        let next: u64 = current
            .as_deref()
            .and_then(|s| s.parse().ok())
            .map_or(1, |n: u64| n + 1);

        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.log_path, body)?;
        fs::write(&self.etag_path, next.to_string())?;
        debug!(path = %self.log_path.display(), generation = next, "log written");
        Ok(next.to_string())
    }
}
