//! バックエンド・タイマーの抽象
//!
//! ブラウザでは fetch + gloo タイマー、CLIでは reqwest + tokio で実装する。
//! シングルスレッド前提なので Future に Send は要求しない。

#![allow(async_fn_in_trait)]

use crate::api::{ClassificationStatus, ClassifyRequest, ClassifyResponse, JobProgress, ResetResponse};
use crate::error::Result;
use std::time::Duration;

/// 分類バックエンド
///
/// 通信失敗は `Error::Transport` で返す。
/// `{error}` ペイロードの解釈は呼び出し側（ClassifyResponse::into_result）で行う。
pub trait ClassificationBackend {
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassifyResponse>;

    /// 一括分類の起動（HTTP成功ステータスなら Ok）
    async fn classify_all(&self, job_id: &str) -> Result<()>;

    async fn reset(&self, job_id: &str) -> Result<ResetResponse>;

    async fn classification_status(&self, job_id: &str) -> Result<ClassificationStatus>;

    async fn job_progress(&self, job_id: &str) -> Result<JobProgress>;
}

/// 非同期スリープ
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}
