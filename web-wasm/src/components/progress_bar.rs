//! プログレスバーコンポーネント

use leptos::prelude::*;

/// ジョブ進捗バー（progress は 0.0〜1.0）
#[component]
pub fn ProgressBar(progress: ReadSignal<f32>, label: ReadSignal<String>) -> impl IntoView {
    view! {
        <div class="progress-container">
            <div class="progress-bar">
                <div
                    class="progress-fill"
                    style=move || format!("width: {}%", progress.get().clamp(0.0, 1.0) * 100.0)
                />
            </div>
            <p class="progress-text">{move || label.get()}</p>
        </div>
    }
}
