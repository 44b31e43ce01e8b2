//! ジョブ進捗ページ
//!
//! スクレイピング/分類ジョブの進捗を定期取得し、Leptos の進捗バーに反映する。
//! 終了（completed / failed）したらページを再読み込みする。

use crate::api::FetchBackend;
use crate::components::progress_bar::ProgressBar;
use crate::dom;
use crate::timer::GlooTimer;
use classify_common::{JobProgress, JobProgressPoller, PollHandle, ProgressView, SyncConfig};
use leptos::prelude::*;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

/// シグナルに書き込む進捗ビュー
struct SignalProgressView {
    set_progress: WriteSignal<f32>,
    set_label: WriteSignal<String>,
}

impl ProgressView for SignalProgressView {
    fn render_progress(&self, progress: &JobProgress) {
        self.set_progress.set(progress.progress.clamp(0.0, 1.0) as f32);
        self.set_label.set(progress.label());
    }

    fn schedule_reload(&self, delay: Duration) {
        dom::schedule_reload(delay);
    }
}

/// 進捗バーを `container_id` の要素にマウントし、ポーリングを開始
#[wasm_bindgen(js_name = "startJobProgress")]
pub fn start_job_progress(job_id: String, container_id: String) -> Result<(), JsValue> {
    let container = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&container_id))
        .ok_or_else(|| JsValue::from_str(&format!("要素が見つかりません: {}", container_id)))?
        .dyn_into::<HtmlElement>()?;

    let (progress, set_progress) = signal(0.0f32);
    let (label, set_label) = signal(String::new());
    leptos::mount::mount_to(container, move || view! { <ProgressBar progress=progress label=label/> }).forget();

    let config = SyncConfig::default();
    spawn_local(async move {
        let backend = FetchBackend::default();
        let view = SignalProgressView { set_progress, set_label };
        let poller = JobProgressPoller::new(&backend, &view, &job_id, config.reload_delay());
        let handle = PollHandle::new();
        poller
            .run(&GlooTimer, config.progress_poll_interval(), &handle)
            .await;
    });
    Ok(())
}
