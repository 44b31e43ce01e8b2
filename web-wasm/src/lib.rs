//! Comment Classification Page (Leptos + WASM)
//!
//! 分類結果ページ（結果バッジ・グラフ・一括分類・リセット・ステータス監視）と
//! ジョブ進捗バーのブラウザ実装。

mod api;
mod charts;
mod components;
mod dom;
mod page;
mod progress;
mod timer;

pub use page::{init_classification, ClassificationPage};
pub use progress::start_job_progress;

use tracing_subscriber::layer::SubscriberExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    init_tracing();
}

/// tracing の出力を開発者コンソールへ流す。今回導入できたら true
pub fn init_tracing() -> bool {
    let config = WASMLayerConfigBuilder::new()
        .set_max_level(tracing::Level::INFO)
        .set_report_logs_in_timings(false)
        .build();
    let subscriber = tracing_subscriber::registry().with(WASMLayer::new(config));
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// 開発者コンソールに警告を出力
pub(crate) fn log_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
