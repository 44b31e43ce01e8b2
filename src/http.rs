//! reqwest による分類バックエンド
//!
//! エラーペイロード（`{error}`）は HTTP ステータスに関係なく本文から読む。
//! 通信失敗・本文のパース失敗は `Error::Transport` に変換する。

use crate::config::Config;
use crate::error::Result;
use classify_common::api::{
    classification_status_path, classify_all_path, job_status_path, reset_path, CLASSIFY_PATH,
};
use classify_common::{
    ClassificationBackend, ClassificationStatus, ClassifyRequest, ClassifyResponse, Error, JobProgress,
    ResetResponse,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> classify_common::Result<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> classify_common::Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!(%status, bytes = text.len(), "response received");

        serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("HTTP {}: レスポンスのパースに失敗: {}", status.as_u16(), e)))
    }
}

impl ClassificationBackend for HttpBackend {
    async fn classify(&self, request: &ClassifyRequest) -> classify_common::Result<ClassifyResponse> {
        let response = self
            .send(self.client.post(self.url(CLASSIFY_PATH)).json(request))
            .await?;
        Self::read_json(response).await
    }

    async fn classify_all(&self, job_id: &str) -> classify_common::Result<()> {
        let response = self
            .send(self.client.post(self.url(&classify_all_path(job_id))))
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Transport(format!("HTTP {}", status.as_u16())))
        }
    }

    async fn reset(&self, job_id: &str) -> classify_common::Result<ResetResponse> {
        let response = self
            .send(self.client.post(self.url(&reset_path(job_id))))
            .await?;
        Self::read_json(response).await
    }

    async fn classification_status(&self, job_id: &str) -> classify_common::Result<ClassificationStatus> {
        let response = self
            .send(self.client.get(self.url(&classification_status_path(job_id))))
            .await?;
        Self::read_json(response).await
    }

    async fn job_progress(&self, job_id: &str) -> classify_common::Result<JobProgress> {
        let response = self
            .send(self.client.get(self.url(&job_status_path(job_id))))
            .await?;
        Self::read_json(response).await
    }
}
