//! 表示アダプタの抽象
//!
//! 業務データは持たず、ストア/集計の出力を受け取って描画するだけ。
//! DOM（WASM）と端末（CLI）で実装する。

use crate::aggregator::Aggregate;
use crate::api::JobProgress;
use crate::types::{ClassificationResult, Sentiment};
use std::time::Duration;

/// カテゴリ名が空のときの表示
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// 一括分類ボタンの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkState {
    Running,
    Finished,
}

/// 分類結果画面の描画先
pub trait Presenter {
    /// 分類中表示
    fn show_pending(&self, index: usize);

    fn show_result(&self, index: usize, result: &ClassificationResult);

    /// 項目単位のエラー表示（ストアは変更されない）
    fn show_item_error(&self, index: usize, message: &str);

    /// 全項目の結果表示をクリア（リセット時）
    fn clear_items(&self, count: usize);

    fn render_charts(&self, aggregate: &Aggregate);

    fn set_bulk_state(&self, state: BulkState);

    fn confirm(&self, message: &str) -> bool;

    fn alert(&self, message: &str);

    /// 画面の再読み込み（全件再同期）
    fn schedule_reload(&self, delay: Duration);
}

/// ジョブ進捗画面の描画先
pub trait ProgressView {
    fn render_progress(&self, progress: &JobProgress);

    fn schedule_reload(&self, delay: Duration);
}

/// 結果バッジの表示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub category: String,
    pub sentiment_text: String,
    /// CSSクラス（例: "sentiment sentiment-pozytywny"）
    pub sentiment_class: String,
}

impl Badge {
    pub fn from_result(result: &ClassificationResult) -> Self {
        let category = if result.category.is_empty() {
            UNKNOWN_CATEGORY_LABEL.to_string()
        } else {
            result.category.clone()
        };

        let (sentiment_text, modifier) = match &result.sentiment {
            Sentiment::Known(label) => (
                format!("{} {}", label.emoji(), label.display_name()),
                label.wire_name().to_string(),
            ),
            Sentiment::Unrecognized(raw) if raw.trim().is_empty() => {
                ("❓ -".to_string(), "unknown".to_string())
            }
            Sentiment::Unrecognized(raw) => (format!("❓ {}", raw), "unknown".to_string()),
        };

        Self {
            category,
            sentiment_text,
            sentiment_class: format!("sentiment sentiment-{}", modifier),
        }
    }
}
