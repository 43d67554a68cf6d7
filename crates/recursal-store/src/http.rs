//! HTTP log client — etag-conditional GET/PUT against an object endpoint
//!
//! Works with any store that honors `ETag`/`If-Match`/`If-None-Match`
//! (S3-compatible gateways, WebDAV, nginx with dav_methods). Requests are
//! timeout-bounded; a timeout surfaces as a typed failure, never a silent
//! retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::client::{LogClient, LogSnapshot};
use crate::error::{StoreError, StoreResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpLogClient {
    client: Client,
    url: String,
}

impl HttpLogClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl LogClient for HttpLogClient {
    async fn fetch(&self) -> StoreResult<LogSnapshot> {
        let response = self.client.get(&self.url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LogSnapshot::default());
        }
        if !response.status().is_success() {
            return Err(StoreError::Http(format!(
                "GET {} -> {}",
                self.url,
                response.status()
            )));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();
        debug!(url = %self.url, bytes = body.len(), "log fetched");
        Ok(LogSnapshot { body, etag })
    }

    async fn put(&self, expected: Option<&str>, body: Vec<u8>) -> StoreResult<String> {
        let mut request = self.client.put(&self.url).body(body);
        request = match expected {
            Some(etag) => request.header(IF_MATCH, etag),
            // Creation must not clobber a log that appeared meanwhile.
            None => request.header(IF_NONE_MATCH, "*"),
        };

        let response = request.send().await?;
        match response.status() {
            StatusCode::PRECONDITION_FAILED => Err(StoreError::VersionConflict),
            status if status.is_success() => response
                .headers()
                .get(ETAG)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
                .ok_or_else(|| StoreError::Http("PUT response carried no ETag".into())),
            status => Err(StoreError::Http(format!("PUT {} -> {}", self.url, status))),
        }
    }
}
