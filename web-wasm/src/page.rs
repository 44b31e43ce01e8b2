//! 分類結果ページのコントローラ
//!
//! ページの初期データからセッションを作り、クリック・ボタン・ステータス監視を結線する。
//! JavaScript からは `initClassification(data)` で得たハンドルを通して操作する。

use crate::api::FetchBackend;
use crate::dom::{DomPresenter, CLASSIFY_ALL_BUTTON_ID, COMMENT_ITEM_SELECTOR, RESET_BUTTON_IDS};
use crate::log_warn;
use crate::timer::GlooTimer;
use classify_common::{
    BulkOutcome, ClassificationClient, ClassificationSession, PageData, PollHandle, ResetOutcome,
    StatusPoller, SyncConfig,
};
use gloo::events::EventListener;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Document, Element};

type PageClient = ClassificationClient<FetchBackend, DomPresenter, GlooTimer>;

struct PageInner {
    session: ClassificationSession,
    client: PageClient,
    poll: PollHandle,
}

fn to_js(err: classify_common::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// 画面に表示されないエラーのみコンソール用メッセージにする（項目エラーは表示済み）
fn unreported_failure(err: &classify_common::Error) -> Option<String> {
    (!err.is_item_failure()).then(|| format!("分類できませんでした: {}", err))
}

/// 分類結果ページのハンドル
#[wasm_bindgen]
pub struct ClassificationPage {
    inner: Rc<PageInner>,
}

/// ページ初期化（既存結果の描画・イベント結線・ステータス監視の開始）
#[wasm_bindgen(js_name = "initClassification")]
pub fn init_classification(page_data: JsValue) -> Result<ClassificationPage, JsValue> {
    let page: PageData = serde_wasm_bindgen::from_value(page_data)?;
    let presenter = DomPresenter::from_window().ok_or_else(|| JsValue::from_str("document がありません"))?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document がありません"))?;

    let inner = Rc::new(PageInner {
        session: ClassificationSession::from_page(page),
        client: ClassificationClient::new(FetchBackend::default(), presenter, GlooTimer, SyncConfig::default()),
        poll: PollHandle::new(),
    });

    inner.client.render_all(&inner.session);
    attach_listeners(&inner, &document)?;
    start_status_polling(&inner);

    Ok(ClassificationPage { inner })
}

fn on_click(target: &Element, inner: &Rc<PageInner>, action: fn(Rc<PageInner>)) {
    let inner = Rc::clone(inner);
    EventListener::new(target, "click", move |_| action(Rc::clone(&inner))).forget();
}

fn attach_listeners(inner: &Rc<PageInner>, document: &Document) -> Result<(), JsValue> {
    // 項目クリック: 未分類のときだけ分類（位置は一覧の並び順）
    let items = document.query_selector_all(COMMENT_ITEM_SELECTOR)?;
    for index in 0..items.length() {
        let Some(item) = items.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let inner = Rc::clone(inner);
        let index = index as usize;
        EventListener::new(&item, "click", move |_| {
            let inner = Rc::clone(&inner);
            spawn_local(async move {
                if let Err(e) = inner.client.classify_if_missing(&inner.session, index).await {
                    if let Some(message) = unreported_failure(&e) {
                        log_warn(&message);
                    }
                }
            });
        })
        .forget();
    }

    if let Some(button) = document.get_element_by_id(CLASSIFY_ALL_BUTTON_ID) {
        on_click(&button, inner, |inner| {
            spawn_local(async move {
                inner.client.classify_all(&inner.session).await;
            })
        });
    }

    for id in RESET_BUTTON_IDS {
        if let Some(button) = document.get_element_by_id(id) {
            on_click(&button, inner, |inner| {
                spawn_local(async move {
                    // 失敗はアラート表示済み
                    let _ = inner.client.reset(&inner.session, &inner.poll).await;
                })
            });
        }
    }
    Ok(())
}

fn start_status_polling(inner: &Rc<PageInner>) {
    if !StatusPoller::<FetchBackend, DomPresenter>::should_start(&inner.session) {
        return;
    }
    let inner = Rc::clone(inner);
    spawn_local(async move {
        let poller = StatusPoller::new(inner.client.backend(), inner.client.presenter());
        let interval = inner.client.config().status_poll_interval();
        poller
            .run(&inner.session, inner.client.timer(), interval, &inner.poll)
            .await;
    });
}

#[wasm_bindgen]
impl ClassificationPage {
    /// 1件分類。分類結果で resolve、失敗時は reject
    pub fn classify(&self, index: usize) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let result = inner
                .client
                .classify_one(&inner.session, index)
                .await
                .map_err(to_js)?;
            Ok(serde_wasm_bindgen::to_value(&result)?)
        })
    }

    /// 全件を順に分類。成功件数で resolve（実行中なら undefined）
    #[wasm_bindgen(js_name = "classifyAll")]
    pub fn classify_all(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            match inner.client.classify_all(&inner.session).await {
                BulkOutcome::Completed { classified, .. } => Ok(JsValue::from(classified as u32)),
                BulkOutcome::AlreadyRunning => Ok(JsValue::UNDEFINED),
            }
        })
    }

    /// リセット。"cancelled" / "restarted" / "restart_failed" で resolve
    pub fn reset(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let outcome = inner.client.reset(&inner.session, &inner.poll).await.map_err(to_js)?;
            let name = match outcome {
                ResetOutcome::Cancelled => "cancelled",
                ResetOutcome::Restarted => "restarted",
                ResetOutcome::RestartFailed => "restart_failed",
            };
            Ok(JsValue::from_str(name))
        })
    }

    #[wasm_bindgen(js_name = "stopPolling")]
    pub fn stop_polling(&self) {
        if !self.inner.poll.stop() {
            log_warn("ステータス監視は既に停止しています");
        }
    }

    #[wasm_bindgen(js_name = "classifiedCount")]
    pub fn classified_count(&self) -> usize {
        self.inner.session.classified_count()
    }

    /// 現在の集計
    pub fn aggregate(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.session.aggregate())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classify_common::Error;

    #[test]
    fn test_unknown_item_is_logged() {
        let message = unreported_failure(&Error::UnknownItem(7)).expect("ログ出力されるはず");
        assert!(message.contains("index 7"));
    }

    #[test]
    fn test_item_failures_are_not_logged_twice() {
        assert_eq!(unreported_failure(&Error::Transport("timeout".to_string())), None);
        assert_eq!(unreported_failure(&Error::Backend("Brak kategorii".to_string())), None);
    }
}
