//! 分類クライアント
//!
//! 1件分類・一括分類・リセットの各フローを実行し、
//! バックエンドの応答をストア更新 → 集計 → 描画 に変換する。
//! ストアの借用は await をまたがず、描画は更新が終わってから行う。

use crate::api::ClassifyRequest;
use crate::backend::{ClassificationBackend, Timer};
use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::poller::PollHandle;
use crate::presenter::{BulkState, Presenter};
use crate::session::ClassificationSession;
use crate::types::ClassificationResult;
use tracing::{debug, error, info, warn};

/// リセット確認メッセージ
pub const RESET_CONFIRM_MESSAGE: &str = "分類結果をリセットして再分類しますか？";

/// リセット失敗メッセージ
pub const RESET_FAILED_MESSAGE: &str = "分類のリセットに失敗しました";

/// 再分類の起動失敗メッセージ
pub const RESTART_FAILED_MESSAGE: &str = "リセットは完了しましたが、再分類を開始できませんでした";

/// 一括分類の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Completed { classified: usize, failed: usize },
    /// 既に実行中のため何もしなかった
    AlreadyRunning,
}

/// リセットの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// 確認ダイアログでキャンセル
    Cancelled,
    /// リセット成功・再分類を起動（リロード予約済み）
    Restarted,
    /// リセット成功・再分類の起動に失敗
    RestartFailed,
}

/// 分類クライアント
pub struct ClassificationClient<B, P, T> {
    backend: B,
    presenter: P,
    timer: T,
    config: SyncConfig,
}

impl<B, P, T> ClassificationClient<B, P, T>
where
    B: ClassificationBackend,
    P: Presenter,
    T: Timer,
{
    pub fn new(backend: B, presenter: P, timer: T, config: SyncConfig) -> Self {
        Self {
            backend,
            presenter,
            timer,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// 既存の結果をすべて描画（ページ読み込み直後）
    pub fn render_all(&self, session: &ClassificationSession) {
        let results: Vec<(usize, ClassificationResult)> =
            session.store().iter().map(|(i, r)| (i, r.clone())).collect();
        for (index, result) in &results {
            self.presenter.show_result(*index, result);
        }
        self.presenter.render_charts(&session.aggregate());
    }

    /// 1件分類
    ///
    /// 成功時のみストアを更新する。エラーペイロード・通信失敗は項目にインライン表示して返す。
    pub async fn classify_one(&self, session: &ClassificationSession, index: usize) -> Result<ClassificationResult> {
        let comment_text = session
            .comment_text(index)
            .ok_or(Error::UnknownItem(index))?
            .to_string();

        self.presenter.show_pending(index);

        let request = ClassifyRequest {
            job_id: session.job_id().to_string(),
            comment_index: index,
            comment_text,
            categories: session.categories().to_vec(),
        };

        let outcome = match self.backend.classify(&request).await {
            Ok(response) => response.into_result(),
            Err(e) => Err(e),
        };

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(index, error = %e, "classification failed");
                self.presenter.show_item_error(index, &e.to_string());
                return Err(e);
            }
        };

        let replaced = session.upsert(index, result.clone());
        debug!(index, replaced = replaced.is_some(), "stored classification result");

        self.presenter.show_result(index, &result);
        self.presenter.render_charts(&session.aggregate());
        Ok(result)
    }

    /// 未分類の場合のみ分類（項目クリック時）
    pub async fn classify_if_missing(
        &self,
        session: &ClassificationSession,
        index: usize,
    ) -> Result<Option<ClassificationResult>> {
        if session.has_result(index) {
            return Ok(None);
        }
        self.classify_one(session, index).await.map(Some)
    }

    /// 全件を先頭から順に分類
    ///
    /// 1件ずつ完了を待ち、間に固定の待ち時間を入れる。
    /// 実行中に再度呼ばれた場合は何もしない。
    pub async fn classify_all(&self, session: &ClassificationSession) -> BulkOutcome {
        let Some(_guard) = session.try_begin_bulk() else {
            debug!("classify_all already running");
            return BulkOutcome::AlreadyRunning;
        };

        self.presenter.set_bulk_state(BulkState::Running);
        info!(total = session.comment_count(), "classify_all started");

        let mut classified = 0;
        let mut failed = 0;
        for index in 0..session.comment_count() {
            match self.classify_one(session, index).await {
                Ok(_) => classified += 1,
                Err(_) => failed += 1,
            }
            self.timer.sleep(self.config.classify_all_delay()).await;
        }

        info!(classified, failed, "classify_all finished");
        self.presenter.set_bulk_state(BulkState::Finished);
        BulkOutcome::Completed { classified, failed }
    }

    /// 分類のリセット
    ///
    /// サーバーが明示的に成功を返した場合のみローカル状態を破棄し、ステータス監視を止める。
    /// 失敗時は何も変更せず、ユーザーに通知する（再試行は手動）。
    pub async fn reset(&self, session: &ClassificationSession, poll: &PollHandle) -> Result<ResetOutcome> {
        if !self.presenter.confirm(RESET_CONFIRM_MESSAGE) {
            return Ok(ResetOutcome::Cancelled);
        }

        let response = match self.backend.reset(session.job_id()).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "reset request failed");
                self.presenter.alert(RESET_FAILED_MESSAGE);
                return Err(e);
            }
        };

        if !response.success {
            error!(error = ?response.error, "reset rejected by backend");
            self.presenter.alert(RESET_FAILED_MESSAGE);
            return Err(Error::ResetRejected);
        }

        if poll.stop() {
            debug!("status polling stopped by reset");
        }
        session.clear_results();
        self.presenter.clear_items(session.comment_count());
        self.presenter.render_charts(&session.aggregate());
        info!(job_id = session.job_id(), "classification reset");

        match self.backend.classify_all(session.job_id()).await {
            Ok(()) => {
                self.presenter.schedule_reload(self.config.reload_delay());
                Ok(ResetOutcome::Restarted)
            }
            Err(e) => {
                error!(error = %e, "failed to restart bulk classification");
                self.presenter.alert(RESTART_FAILED_MESSAGE);
                Ok(ResetOutcome::RestartFailed)
            }
        }
    }
}
