//! Recursal Store - append-only feedback log, exemplar retrieval, aggregation

pub mod client;
pub mod error;
pub mod feedback;
pub mod fs;
pub mod http;
pub mod report;
pub mod retriever;

pub use client::{LogClient, LogSnapshot, MemoryLogClient};
pub use error::{StoreError, StoreResult};
pub use feedback::{FeedbackStore, MAX_APPEND_ATTEMPTS};
pub use fs::FsLogClient;
pub use http::HttpLogClient;
pub use report::{summarize, FeedbackReport};
pub use retriever::{retrieve, select_exemplar};
