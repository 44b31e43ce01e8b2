//! バックエンドAPIのリクエスト/レスポンス型
//!
//! - POST /api/classify
//! - POST /api/classify-all/{job_id}
//! - POST /api/reset-classification/{job_id}
//! - GET  /api/classification-status/{job_id}
//! - GET  /api/status/{job_id}

use crate::error::{Error, Result};
use crate::types::{null_as_default, CategoryDescriptor, ClassificationResult, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CLASSIFY_PATH: &str = "/api/classify";

pub fn classify_all_path(job_id: &str) -> String {
    format!("/api/classify-all/{}", job_id)
}

pub fn reset_path(job_id: &str) -> String {
    format!("/api/reset-classification/{}", job_id)
}

pub fn classification_status_path(job_id: &str) -> String {
    format!("/api/classification-status/{}", job_id)
}

pub fn job_status_path(job_id: &str) -> String {
    format!("/api/status/{}", job_id)
}

/// 1件分類リクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub job_id: String,
    pub comment_index: usize,
    pub comment_text: String,
    pub categories: Vec<CategoryDescriptor>,
}

/// 1件分類レスポンス（結果 or `{error}`）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    #[serde(default)]
    pub sentiment: Sentiment,
}

impl ClassifyResponse {
    /// エラーペイロードまたは空の結果は Backend エラーとして返す
    pub fn into_result(self) -> Result<ClassificationResult> {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            return Err(Error::Backend(message));
        }

        let result = ClassificationResult {
            category: self.category,
            sentiment: self.sentiment,
        };
        if result.is_blank() {
            return Err(Error::Backend("分類結果が空です".to_string()));
        }
        Ok(result)
    }
}

/// リセットレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResetResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// ジョブ状態
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum JobState {
    #[default]
    Pending,
    Scraping,
    Classifying,
    Completed,
    Failed,
    Other(String),
}

impl JobState {
    /// これ以上進捗しない状態（成功/失敗）
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobState::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "pending",
            JobState::Scraping => "scraping",
            JobState::Classifying => "classifying",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Other(s) => s,
        }
    }
}

impl From<Option<String>> for JobState {
    fn from(value: Option<String>) -> Self {
        let Some(value) = value else {
            return JobState::Pending;
        };
        match value.trim().to_lowercase().as_str() {
            "" | "pending" => JobState::Pending,
            "scraping" => JobState::Scraping,
            "classifying" => JobState::Classifying,
            "completed" => JobState::Completed,
            "failed" => JobState::Failed,
            _ => JobState::Other(value),
        }
    }
}

/// 分類ステータス（ポーリング用）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassificationStatus {
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub has_classification: bool,

    #[serde(default)]
    pub status: JobState,

    #[serde(default, deserialize_with = "null_as_default")]
    pub classification_results: HashMap<String, ClassificationResult>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub classification_count: usize,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_comments: usize,
}

impl ClassificationStatus {
    /// 全件分類済みかつ成功で終了
    pub fn is_finished(&self) -> bool {
        self.classification_count == self.total_comments && self.status.is_success()
    }
}

/// ジョブ進捗（進捗バー用）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobProgress {
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub current_step: String,

    #[serde(default)]
    pub status: JobState,
}

impl JobProgress {
    /// 0〜100 に丸めたパーセンテージ
    pub fn percent(&self) -> u32 {
        (self.progress.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// 表示テキスト（例: "45% - Klasyfikacja"）
    pub fn label(&self) -> String {
        format!("{}% - {}", self.percent(), self.current_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentLabel;

    #[test]
    fn test_paths() {
        assert_eq!(classify_all_path("abc-1"), "/api/classify-all/abc-1");
        assert_eq!(reset_path("abc-1"), "/api/reset-classification/abc-1");
        assert_eq!(classification_status_path("abc-1"), "/api/classification-status/abc-1");
        assert_eq!(job_status_path("abc-1"), "/api/status/abc-1");
    }

    #[test]
    fn test_classify_request_serialize() {
        let request = ClassifyRequest {
            job_id: "job-1".to_string(),
            comment_index: 3,
            comment_text: "Za drogo".to_string(),
            categories: vec![CategoryDescriptor::new("Cena").with_definition("Ceny produktów")],
        };
        let json = serde_json::to_value(&request).expect("シリアライズ失敗");
        assert_eq!(json["job_id"], "job-1");
        assert_eq!(json["comment_index"], 3);
        assert_eq!(json["comment_text"], "Za drogo");
        assert_eq!(json["categories"][0]["aspekt"], "Cena");
        assert_eq!(json["categories"][0]["definicja"], "Ceny produktów");
    }

    #[test]
    fn test_classify_response_success() {
        let response: ClassifyResponse =
            serde_json::from_str(r#"{"category": "Cena", "sentiment": "negatywny"}"#).expect("デシリアライズ失敗");
        let result = response.into_result().expect("結果が得られるはず");
        assert_eq!(result, ClassificationResult::new("Cena", SentimentLabel::Negative));
    }

    #[test]
    fn test_classify_response_error_payload() {
        let response: ClassifyResponse =
            serde_json::from_str(r#"{"error": "Zadanie nie znalezione"}"#).expect("デシリアライズ失敗");
        match response.into_result() {
            Err(Error::Backend(message)) => assert_eq!(message, "Zadanie nie znalezione"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_classify_response_blank_is_error() {
        let response: ClassifyResponse = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(matches!(response.into_result(), Err(Error::Backend(_))));
    }

    #[test]
    fn test_classify_response_null_error_is_success() {
        let response: ClassifyResponse =
            serde_json::from_str(r#"{"error": null, "category": "Cena", "sentiment": "pozytywny"}"#)
                .expect("デシリアライズ失敗");
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn test_reset_response() {
        let ok: ResetResponse = serde_json::from_str(r#"{"success": true, "message": "ok"}"#).expect("デシリアライズ失敗");
        assert!(ok.success);
        let missing: ResetResponse = serde_json::from_str(r#"{"error": "Job not found"}"#).expect("デシリアライズ失敗");
        assert!(!missing.success);
    }

    #[test]
    fn test_job_state_parse() {
        let states: Vec<JobState> =
            serde_json::from_str(r#"["completed", "FAILED", "classifying", null, "archived"]"#).expect("デシリアライズ失敗");
        assert_eq!(states[0], JobState::Completed);
        assert_eq!(states[1], JobState::Failed);
        assert_eq!(states[2], JobState::Classifying);
        assert_eq!(states[3], JobState::Pending);
        assert_eq!(states[4], JobState::Other("archived".to_string()));
        assert!(states[0].is_terminal() && states[0].is_success());
        assert!(states[1].is_terminal() && !states[1].is_success());
        assert!(!states[4].is_terminal());
    }

    #[test]
    fn test_classification_status_deserialize() {
        let json = r#"{
            "has_classification": true,
            "status": "classifying",
            "classification_results": {
                "0": {"category": "Cena", "sentiment": "negatywny"},
                "2": {"category": "Obsługa", "sentiment": "pozytywny"}
            },
            "classification_count": 2,
            "total_comments": 3
        }"#;
        let status: ClassificationStatus = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(status.has_classification);
        assert_eq!(status.classification_results.len(), 2);
        assert!(!status.is_finished());
    }

    #[test]
    fn test_classification_status_finished() {
        let status: ClassificationStatus = serde_json::from_str(
            r#"{"has_classification": true, "status": "completed", "classification_results": null,
                "classification_count": 3, "total_comments": 3}"#,
        )
        .expect("デシリアライズ失敗");
        assert!(status.classification_results.is_empty());
        assert!(status.is_finished());
    }

    #[test]
    fn test_job_progress_label() {
        let progress: JobProgress =
            serde_json::from_str(r#"{"progress": 0.456, "current_step": "Klasyfikacja", "status": "classifying"}"#)
                .expect("デシリアライズ失敗");
        assert_eq!(progress.percent(), 46);
        assert_eq!(progress.label(), "46% - Klasyfikacja");

        let overflow = JobProgress { progress: 1.7, ..Default::default() };
        assert_eq!(overflow.percent(), 100);
    }
}
