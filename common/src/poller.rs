//! ステータスポーリング
//!
//! - StatusPoller: 分類ステータスを定期取得し、ローカルにない結果を取り込む。
//!   別タブやサーバー側一括処理の結果もこれで画面に反映される。
//! - JobProgressPoller: ジョブ進捗（進捗バー）を定期取得する。
//!
//! どちらも終了条件を満たしたら PollHandle を一度だけ停止し、リロードを予約する。
//! 各ティックは冪等なので、重なって実行されても集計は壊れない。

use crate::api::ClassificationStatus;
use crate::backend::{ClassificationBackend, Timer};
use crate::error::{Error, Result};
use crate::presenter::{Presenter, ProgressView};
use crate::session::ClassificationSession;
use crate::store::parse_index;
use crate::types::ClassificationResult;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 周期タスクの停止ハンドル
#[derive(Debug, Clone, Default)]
pub struct PollHandle {
    stopped: Rc<Cell<bool>>,
}

impl PollHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 停止する。最初の呼び出しのときだけ true
    pub fn stop(&self) -> bool {
        !self.stopped.replace(true)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// 1ティックの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// 継続（取り込んだ件数）
    Pending { merged: usize },
    /// 終了条件を満たした
    Finished,
}

/// 分類ステータスのポーラー
pub struct StatusPoller<'a, B, P> {
    backend: &'a B,
    presenter: &'a P,
}

impl<'a, B, P> StatusPoller<'a, B, P>
where
    B: ClassificationBackend,
    P: Presenter,
{
    pub fn new(backend: &'a B, presenter: &'a P) -> Self {
        Self { backend, presenter }
    }

    /// ポーリングを開始すべきか（全件分類済みなら不要）
    pub fn should_start(session: &ClassificationSession) -> bool {
        !session.is_complete()
    }

    /// ステータスの結果のうち、ローカルにないものだけ取り込んで描画
    pub fn merge(&self, session: &ClassificationSession, status: &ClassificationStatus) -> usize {
        let mut entries: Vec<(usize, &ClassificationResult)> = status
            .classification_results
            .iter()
            .filter_map(|(key, result)| parse_index(key).map(|i| (i, result)))
            .filter(|(i, _)| *i < session.comment_count())
            .collect();
        entries.sort_by_key(|(i, _)| *i);

        let mut merged = 0;
        for (index, result) in entries {
            if session.insert_missing(index, result) {
                self.presenter.show_result(index, result);
                merged += 1;
            }
        }

        if merged > 0 {
            debug!(merged, "merged server-side classification results");
            self.presenter.render_charts(&session.aggregate());
        }
        merged
    }

    /// 1回分のポーリング
    ///
    /// 応答待ちの間にリセットされた場合、その応答はリセット前のものなので取り込まない。
    pub async fn tick(&self, session: &ClassificationSession) -> Result<PollOutcome> {
        let generation = session.generation();
        let status = self.backend.classification_status(session.job_id()).await?;

        if session.generation() != generation {
            debug!("discarding status fetched before reset");
            return Ok(PollOutcome::Pending { merged: 0 });
        }

        if let Some(message) = status.error.as_ref().filter(|m| !m.is_empty()) {
            return Err(Error::Backend(message.clone()));
        }

        let merged = if status.has_classification {
            self.merge(session, &status)
        } else {
            0
        };

        if status.is_finished() {
            return Ok(PollOutcome::Finished);
        }
        Ok(PollOutcome::Pending { merged })
    }

    /// 停止してリロードを予約（最初の1回のみ有効）
    pub fn finish(&self, handle: &PollHandle) {
        if handle.stop() {
            info!("classification finished, reloading");
            self.presenter.schedule_reload(Duration::ZERO);
        }
    }

    /// 停止されるまで一定間隔でポーリング
    pub async fn run<T: Timer>(
        &self,
        session: &ClassificationSession,
        timer: &T,
        interval: Duration,
        handle: &PollHandle,
    ) {
        while !handle.is_stopped() {
            timer.sleep(interval).await;
            if handle.is_stopped() {
                break;
            }
            match self.tick(session).await {
                Ok(PollOutcome::Finished) => self.finish(handle),
                Ok(PollOutcome::Pending { .. }) => {}
                Err(e) => warn!(error = %e, "status poll failed"),
            }
        }
    }
}

/// ジョブ進捗のポーラー
pub struct JobProgressPoller<'a, B, V> {
    backend: &'a B,
    view: &'a V,
    job_id: &'a str,
    reload_delay: Duration,
}

impl<'a, B, V> JobProgressPoller<'a, B, V>
where
    B: ClassificationBackend,
    V: ProgressView,
{
    pub fn new(backend: &'a B, view: &'a V, job_id: &'a str, reload_delay: Duration) -> Self {
        Self {
            backend,
            view,
            job_id,
            reload_delay,
        }
    }

    pub async fn tick(&self) -> Result<PollOutcome> {
        let progress = self.backend.job_progress(self.job_id).await?;
        self.view.render_progress(&progress);

        if progress.status.is_terminal() {
            return Ok(PollOutcome::Finished);
        }
        Ok(PollOutcome::Pending { merged: 0 })
    }

    pub fn finish(&self, handle: &PollHandle) {
        if handle.stop() {
            info!(job_id = self.job_id, "job reached terminal status, reloading");
            self.view.schedule_reload(self.reload_delay);
        }
    }

    pub async fn run<T: Timer>(&self, timer: &T, interval: Duration, handle: &PollHandle) {
        while !handle.is_stopped() {
            timer.sleep(interval).await;
            if handle.is_stopped() {
                break;
            }
            match self.tick().await {
                Ok(PollOutcome::Finished) => self.finish(handle),
                Ok(PollOutcome::Pending { .. }) => {}
                Err(e) => warn!(error = %e, "progress poll failed"),
            }
        }
    }
}
