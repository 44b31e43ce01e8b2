//! 分類フローの結合テスト
//!
//! HTTPバックエンド + 端末表示 + 共通ロジックを wiremock のサーバーに対して通しで検証

use classify_common::{
    BulkOutcome, CategoryDescriptor, ClassificationClient, ClassificationSession, Comment, PollHandle,
    ResetOutcome, SentimentLabel, StatusPoller, SyncConfig,
};
use comment_classify::http::HttpBackend;
use comment_classify::terminal::{TerminalPresenter, TokioTimer};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> ClassificationSession {
    ClassificationSession::new(
        "job-9",
        vec![
            Comment::new("Obsługa bardzo miła"),
            Comment {
                text: None,
                comment_text: Some("Za drogo".to_string()),
            },
            Comment::new("Nic szczególnego"),
        ],
        vec![CategoryDescriptor::new("Obsługa"), CategoryDescriptor::new("Cena")],
    )
}

type Client = ClassificationClient<HttpBackend, TerminalPresenter, TokioTimer>;

fn client(server: &MockServer, assume_yes: bool) -> Client {
    let backend = HttpBackend::new(server.uri(), Duration::from_secs(5)).expect("クライアント作成失敗");
    ClassificationClient::new(
        backend,
        TerminalPresenter::new(assume_yes, false),
        TokioTimer,
        SyncConfig::immediate(),
    )
}

async fn mount_classify(server: &MockServer, index: usize, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/classify"))
        .and(body_partial_json(json!({"comment_index": index})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// 一括分類: 失敗した項目はストアに入らず、他の項目は続行される
#[tokio::test]
async fn test_classify_all_with_one_failure() {
    let server = MockServer::start().await;
    mount_classify(&server, 0, json!({"category": "Obsługa", "sentiment": "pozytywny"})).await;
    mount_classify(&server, 1, json!({"error": "Model niedostępny"})).await;
    mount_classify(&server, 2, json!({"category": "Cena", "sentiment": "neutralny"})).await;

    let session = session();
    let client = client(&server, false);

    let outcome = client.classify_all(&session).await;

    assert_eq!(outcome, BulkOutcome::Completed { classified: 2, failed: 1 });
    assert!(session.has_result(0));
    assert!(!session.has_result(1));
    let agg = session.aggregate();
    assert_eq!(agg.category_count("Obsługa"), Some(1));
    assert_eq!(agg.category_count("Cena"), Some(1));
    assert_eq!(agg.sentiments.get(SentimentLabel::Positive), 1);
    assert_eq!(agg.sentiments.get(SentimentLabel::Neutral), 1);
    assert!(!session.is_bulk_running());
}

/// comment_text へのフォールバックがリクエストに反映される
#[tokio::test]
async fn test_classify_uses_comment_text_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/classify"))
        .and(body_partial_json(json!({"comment_index": 1, "comment_text": "Za drogo", "job_id": "job-9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"category": "Cena", "sentiment": "negatywny"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = session();
    let client = client(&server, false);
    let result = client.classify_one(&session, 1).await.expect("分類失敗");
    assert_eq!(result.category, "Cena");
}

/// リセット成功: ローカル状態を破棄し、一括分類を再開してリロードを要求
#[tokio::test]
async fn test_reset_restarts_bulk_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reset-classification/job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/classify-all/job-9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = session();
    session.upsert(0, classify_common::ClassificationResult::new("Cena", SentimentLabel::Negative));
    let client = client(&server, true);

    let outcome = client.reset(&session, &PollHandle::new()).await.expect("リセット失敗");

    assert_eq!(outcome, ResetOutcome::Restarted);
    assert_eq!(session.classified_count(), 0);
    assert_eq!(client.presenter().reload_requested(), Some(Duration::ZERO));
}

/// リセット拒否: ローカル状態はそのまま
#[tokio::test]
async fn test_reset_rejected_keeps_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reset-classification/job-9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Job not found"})))
        .mount(&server)
        .await;

    let session = session();
    session.upsert(0, classify_common::ClassificationResult::new("Cena", SentimentLabel::Negative));
    let client = client(&server, true);

    let result = client.reset(&session, &PollHandle::new()).await;

    assert!(matches!(result, Err(classify_common::Error::ResetRejected)));
    assert_eq!(session.classified_count(), 1);
    assert_eq!(client.presenter().reload_requested(), None);
}

/// ステータス監視: 完了まで取り込み、リロードを一度だけ要求
#[tokio::test]
async fn test_watch_until_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/classification-status/job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_classification": true,
            "status": "completed",
            "classification_results": {
                "0": {"category": "Obsługa", "sentiment": "pozytywny"},
                "1": {"category": "Cena", "sentiment": "negatywny"},
                "2": {"category": "Cena", "sentiment": "neutralny"}
            },
            "classification_count": 3,
            "total_comments": 3
        })))
        .mount(&server)
        .await;

    let session = session();
    let client = client(&server, false);
    assert!(StatusPoller::<HttpBackend, TerminalPresenter>::should_start(&session));

    let poller = StatusPoller::new(client.backend(), client.presenter());
    let handle = PollHandle::new();
    poller
        .run(&session, client.timer(), Duration::from_millis(10), &handle)
        .await;

    assert!(handle.is_stopped());
    assert!(session.is_complete());
    assert_eq!(session.aggregate().category_count("Cena"), Some(2));
    assert_eq!(client.presenter().reload_requested(), Some(Duration::ZERO));
}
