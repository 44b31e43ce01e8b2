//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 通信失敗（ネットワーク断・レスポンスのパース失敗など）
    #[error("通信エラー: {0}")]
    Transport(String),

    /// 通信は成功したがサーバーがエラーを返した
    #[error("サーバーエラー: {0}")]
    Backend(String),

    #[error("リセットが拒否されました")]
    ResetRejected,

    #[error("コメントが存在しません: index {0}")]
    UnknownItem(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// 項目単位でインライン表示するエラーか
    pub fn is_item_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Backend(_) | Error::Json(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
