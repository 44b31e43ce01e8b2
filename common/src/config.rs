//! 同期処理のタイミング設定

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 一括分類・ポーリング・リロードの間隔（ミリ秒）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// 一括分類のリクエスト間隔（サーバー負荷対策）
    pub classify_all_delay_ms: u64,
    /// 分類ステータスのポーリング間隔
    pub status_poll_interval_ms: u64,
    /// ジョブ進捗のポーリング間隔
    pub progress_poll_interval_ms: u64,
    /// リセット後・ジョブ終了後のリロード待ち
    pub reload_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            classify_all_delay_ms: 500,
            status_poll_interval_ms: 3000,
            progress_poll_interval_ms: 5000,
            reload_delay_ms: 1000,
        }
    }
}

impl SyncConfig {
    /// 待ち時間なし（テスト・バッチ実行用）
    pub fn immediate() -> Self {
        Self {
            classify_all_delay_ms: 0,
            status_poll_interval_ms: 0,
            progress_poll_interval_ms: 0,
            reload_delay_ms: 0,
        }
    }

    pub fn classify_all_delay(&self) -> Duration {
        Duration::from_millis(self.classify_all_delay_ms)
    }

    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_interval_ms)
    }

    pub fn progress_poll_interval(&self) -> Duration {
        Duration::from_millis(self.progress_poll_interval_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}
