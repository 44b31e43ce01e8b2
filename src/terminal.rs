//! 端末出力
//!
//! 結果バッジ・テキストグラフ・進捗バーを標準出力に描画する。
//! ブラウザの「リロード」は端末では監視の終了として扱う。

use classify_common::aggregator::{share_percent, truncate_label};
use classify_common::{
    Aggregate, Badge, BulkState, ClassificationResult, JobProgress, Presenter, ProgressView, Timer,
};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::time::Duration;

const BAR_WIDTH: usize = 30;

/// 件数を最大値に対する長さの棒にする
fn bar(value: u32, max: u32) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (value as usize * BAR_WIDTH + max as usize / 2) / max as usize;
    "█".repeat(len)
}

/// 集計をテキストのグラフに整形
pub fn format_charts(aggregate: &Aggregate) -> String {
    let mut out = String::new();

    out.push_str("カテゴリ別件数\n");
    let categories = aggregate.category_series();
    let max = categories.values.iter().copied().max().unwrap_or(0);
    for (label, value) in categories.labels.iter().zip(&categories.values) {
        out.push_str(&format!(
            "  {:<20} {:>4} {}\n",
            truncate_label(label),
            value,
            bar(*value, max)
        ));
    }

    out.push_str("感情分布\n");
    let sentiments = aggregate.sentiment_series();
    let total: u32 = sentiments.values.iter().sum();
    for (label, value) in sentiments.labels.iter().zip(&sentiments.values) {
        out.push_str(&format!(
            "  {:<20} {:>4} ({:.1}%) {}\n",
            label,
            value,
            share_percent(*value, total),
            bar(*value, total)
        ));
    }

    if aggregate.unrecognized_sentiments > 0 {
        out.push_str(&format!("  (不明な感情ラベル: {}件)\n", aggregate.unrecognized_sentiments));
    }
    out.push_str(&format!("分類済み: {}件\n", aggregate.classified));
    out
}

/// 1行分のバッジ表示
pub fn format_badge(index: usize, result: &ClassificationResult) -> String {
    let badge = Badge::from_result(result);
    format!("  [{}] {} | {}", index, badge.category, badge.sentiment_text)
}

/// 端末用の表示アダプタ
pub struct TerminalPresenter {
    assume_yes: bool,
    show_charts: bool,
    reload: Cell<Option<Duration>>,
}

impl TerminalPresenter {
    pub fn new(assume_yes: bool, show_charts: bool) -> Self {
        Self {
            assume_yes,
            show_charts,
            reload: Cell::new(None),
        }
    }

    /// 再同期（リロード）が要求されたか
    pub fn reload_requested(&self) -> Option<Duration> {
        self.reload.get()
    }
}

impl Presenter for TerminalPresenter {
    fn show_pending(&self, index: usize) {
        println!("  [{}] 分類中...", index);
    }

    fn show_result(&self, index: usize, result: &ClassificationResult) {
        println!("{}", format_badge(index, result));
    }

    fn show_item_error(&self, index: usize, message: &str) {
        println!("  [{}] ❌ {}", index, message);
    }

    fn clear_items(&self, count: usize) {
        println!("- {}件の分類結果をクリアしました", count);
    }

    fn render_charts(&self, aggregate: &Aggregate) {
        if self.show_charts {
            println!("{}", format_charts(aggregate));
        }
    }

    fn set_bulk_state(&self, state: BulkState) {
        match state {
            BulkState::Running => println!("[1/1] 一括分類中..."),
            BulkState::Finished => println!("✔ 一括分類完了"),
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }

    fn schedule_reload(&self, delay: Duration) {
        self.reload.set(Some(delay));
    }
}

/// indicatif の進捗バー
pub struct TerminalProgress {
    bar: ProgressBar,
    reload: Cell<Option<Duration>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self {
            bar,
            reload: Cell::new(None),
        }
    }

    pub fn reload_requested(&self) -> Option<Duration> {
        self.reload.get()
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressView for TerminalProgress {
    fn render_progress(&self, progress: &JobProgress) {
        self.bar.set_position(progress.percent() as u64);
        self.bar.set_message(format!("{} ({})", progress.current_step, progress.status.as_str()));
    }

    fn schedule_reload(&self, delay: Duration) {
        self.reload.set(Some(delay));
        self.bar.finish();
    }
}

/// tokio のスリープ
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
