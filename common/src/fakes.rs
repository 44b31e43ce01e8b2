//! テスト用のバックエンド・表示・タイマー

use crate::aggregator::Aggregate;
use crate::api::{ClassificationStatus, ClassifyRequest, ClassifyResponse, JobProgress, ResetResponse};
use crate::backend::{ClassificationBackend, Timer};
use crate::error::{Error, Result};
use crate::presenter::{BulkState, Presenter, ProgressView};
use crate::types::{ClassificationResult, SentimentLabel};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// 位置ごとの既定の分類結果
pub fn result_for(index: usize) -> ClassificationResult {
    let category = ["Service", "Price"][index % 2];
    ClassificationResult::new(category, SentimentLabel::ALL[index % 3])
}

/// 分類リクエストへの応答
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(ClassificationResult),
    BackendError(String),
    Transport,
}

#[derive(Default)]
pub struct FakeBackend {
    script: RefCell<HashMap<usize, Reply>>,
    requests: RefCell<Vec<ClassifyRequest>>,
    reset_failure: Cell<Option<bool>>,
    reset_calls: Cell<usize>,
    classify_all_fails: Cell<bool>,
    classify_all_calls: Cell<usize>,
    statuses: RefCell<VecDeque<Option<ClassificationStatus>>>,
    status_delayed: Cell<bool>,
    progress: RefCell<VecDeque<Option<JobProgress>>>,
}

impl FakeBackend {
    pub fn script(&self, index: usize, reply: Reply) {
        self.script.borrow_mut().insert(index, reply);
    }

    pub fn classify_requests(&self) -> Vec<ClassifyRequest> {
        self.requests.borrow().clone()
    }

    pub fn set_reset_success(&self, success: bool) {
        self.reset_failure.set(if success { None } else { Some(false) });
    }

    pub fn fail_reset(&self) {
        self.reset_failure.set(Some(true));
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.get()
    }

    pub fn fail_classify_all(&self) {
        self.classify_all_fails.set(true);
    }

    pub fn classify_all_calls(&self) -> usize {
        self.classify_all_calls.get()
    }

    /// 次のステータス応答（None は通信失敗）
    pub fn push_status(&self, status: Option<ClassificationStatus>) {
        self.statuses.borrow_mut().push_back(status);
    }

    /// ステータス取得の途中で一度制御を返す
    pub fn delay_status(&self) {
        self.status_delayed.set(true);
    }

    pub fn push_progress(&self, progress: Option<JobProgress>) {
        self.progress.borrow_mut().push_back(progress);
    }
}

impl ClassificationBackend for FakeBackend {
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassifyResponse> {
        self.requests.borrow_mut().push(request.clone());
        let reply = self
            .script
            .borrow()
            .get(&request.comment_index)
            .cloned()
            .unwrap_or_else(|| Reply::Ok(result_for(request.comment_index)));

        match reply {
            Reply::Ok(result) => Ok(ClassifyResponse {
                error: None,
                category: result.category,
                sentiment: result.sentiment,
            }),
            Reply::BackendError(message) => Ok(ClassifyResponse {
                error: Some(message),
                ..Default::default()
            }),
            Reply::Transport => Err(Error::Transport("connection reset".to_string())),
        }
    }

    async fn classify_all(&self, _job_id: &str) -> Result<()> {
        self.classify_all_calls.set(self.classify_all_calls.get() + 1);
        if self.classify_all_fails.get() {
            return Err(Error::Transport("HTTP 500".to_string()));
        }
        Ok(())
    }

    async fn reset(&self, _job_id: &str) -> Result<ResetResponse> {
        self.reset_calls.set(self.reset_calls.get() + 1);
        match self.reset_failure.get() {
            None => Ok(ResetResponse { success: true, ..Default::default() }),
            Some(false) => Ok(ResetResponse::default()),
            Some(true) => Err(Error::Transport("timeout".to_string())),
        }
    }

    async fn classification_status(&self, _job_id: &str) -> Result<ClassificationStatus> {
        if self.status_delayed.get() {
            YieldNow(false).await;
        }
        match self.statuses.borrow_mut().pop_front() {
            Some(Some(status)) => Ok(status),
            _ => Err(Error::Transport("no status".to_string())),
        }
    }

    async fn job_progress(&self, _job_id: &str) -> Result<JobProgress> {
        match self.progress.borrow_mut().pop_front() {
            Some(Some(progress)) => Ok(progress),
            _ => Err(Error::Transport("no progress".to_string())),
        }
    }
}

/// 描画イベント
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Pending(usize),
    Result(usize, ClassificationResult),
    ItemError(usize, String),
    Cleared(usize),
    Charts(Aggregate),
    Bulk(BulkState),
    Alert(String),
    Reload(Duration),
    Progress(u32, String),
}

pub struct RecordingPresenter {
    events: RefCell<Vec<Event>>,
    confirm_answer: Cell<bool>,
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
        }
    }
}

impl RecordingPresenter {
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn chart_renders(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Charts(_)))
            .count()
    }

    pub fn last_aggregate(&self) -> Option<Aggregate> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            Event::Charts(agg) => Some(agg.clone()),
            _ => None,
        })
    }

    pub fn reloads(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Reload(_)))
            .count()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn show_pending(&self, index: usize) {
        self.push(Event::Pending(index));
    }

    fn show_result(&self, index: usize, result: &ClassificationResult) {
        self.push(Event::Result(index, result.clone()));
    }

    fn show_item_error(&self, index: usize, message: &str) {
        self.push(Event::ItemError(index, message.to_string()));
    }

    fn clear_items(&self, count: usize) {
        self.push(Event::Cleared(count));
    }

    fn render_charts(&self, aggregate: &Aggregate) {
        self.push(Event::Charts(aggregate.clone()));
    }

    fn set_bulk_state(&self, state: BulkState) {
        self.push(Event::Bulk(state));
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirm_answer.get()
    }

    fn alert(&self, message: &str) {
        self.push(Event::Alert(message.to_string()));
    }

    fn schedule_reload(&self, delay: Duration) {
        self.push(Event::Reload(delay));
    }
}

impl ProgressView for RecordingPresenter {
    fn render_progress(&self, progress: &JobProgress) {
        self.push(Event::Progress(progress.percent(), progress.current_step.clone()));
    }

    fn schedule_reload(&self, delay: Duration) {
        self.push(Event::Reload(delay));
    }
}

/// 一度だけ制御を返すタイマー（実時間は待たない）
#[derive(Default)]
pub struct YieldTimer {
    sleeps: RefCell<Vec<Duration>>,
}

impl YieldTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Timer for YieldTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        YieldNow(false).await;
    }
}

struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
