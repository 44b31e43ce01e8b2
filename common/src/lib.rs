//! Classify Common Library
//!
//! CLIとWeb(WASM)で共有される分類状態同期レイヤー
//! （結果ストア・集計・APIクライアント・ポーリング）

pub mod types;
pub mod store;
pub mod aggregator;
pub mod api;
pub mod config;
pub mod backend;
pub mod presenter;
pub mod session;
pub mod client;
pub mod poller;
pub mod error;

#[cfg(test)]
mod fakes;

pub use types::{CategoryDescriptor, ClassificationResult, Comment, Sentiment, SentimentLabel};
pub use store::ResultStore;
pub use aggregator::{aggregate, Aggregate, ChartSeries, SentimentCounts};
pub use api::{ClassificationStatus, ClassifyRequest, ClassifyResponse, JobProgress, JobState, ResetResponse};
pub use config::SyncConfig;
pub use backend::{ClassificationBackend, Timer};
pub use presenter::{Badge, BulkState, Presenter, ProgressView};
pub use session::{ClassificationSession, PageData};
pub use client::{BulkOutcome, ClassificationClient, ResetOutcome};
pub use poller::{JobProgressPoller, PollHandle, PollOutcome, StatusPoller};
pub use error::{Error, Result};
