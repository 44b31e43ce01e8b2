//! fetch API による分類バックエンド
//!
//! 同一オリジンの `/api/...` を呼ぶ。本文は HTTP ステータスに関係なく
//! JSON として読み、`{error}` の解釈は共通ロジックに任せる。

use classify_common::api::{
    classification_status_path, classify_all_path, job_status_path, reset_path, CLASSIFY_PATH,
};
use classify_common::{
    ClassificationBackend, ClassificationStatus, ClassifyRequest, ClassifyResponse, Error, JobProgress,
    ResetResponse, Result,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// JsValue のエラーを通信エラーに変換
fn transport(err: JsValue) -> Error {
    let message = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err));
    Error::Transport(message)
}

/// fetch ベースのバックエンド
#[derive(Debug, Clone, Default)]
pub struct FetchBackend {
    /// 空なら同一オリジン
    base_url: String,
}

impl FetchBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// リクエストを送り、(ステータス, 本文) を返す
    async fn send(&self, method: &str, path: &str, body: Option<String>) -> Result<(u16, String)> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::SameOrigin);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&self.url(path), &opts).map_err(transport)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(transport)?;
        }

        let window = web_sys::window().ok_or_else(|| Error::Transport("window がありません".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let resp: Response = resp_value.dyn_into().map_err(transport)?;

        let text = JsFuture::from(resp.text().map_err(transport)?)
            .await
            .map_err(transport)?
            .as_string()
            .unwrap_or_default();
        Ok((resp.status(), text))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (status, text) = self.send("GET", path, None).await?;
        parse_body(status, &text)
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Option<String>) -> Result<T> {
        let (status, text) = self.send("POST", path, body).await?;
        parse_body(status, &text)
    }
}

/// 本文を JSON として解釈（失敗は通信エラー）
pub fn parse_body<T: DeserializeOwned>(status: u16, text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::Transport(format!("HTTP {}: レスポンスのパースに失敗: {}", status, e)))
}

impl ClassificationBackend for FetchBackend {
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassifyResponse> {
        let body = serde_json::to_string(request)?;
        self.post_json(CLASSIFY_PATH, Some(body)).await
    }

    async fn classify_all(&self, job_id: &str) -> Result<()> {
        let (status, _) = self.send("POST", &classify_all_path(job_id), None).await?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(Error::Transport(format!("HTTP {}", status)))
        }
    }

    async fn reset(&self, job_id: &str) -> Result<ResetResponse> {
        self.post_json(&reset_path(job_id), None).await
    }

    async fn classification_status(&self, job_id: &str) -> Result<ClassificationStatus> {
        self.get_json(&classification_status_path(job_id)).await
    }

    async fn job_progress(&self, job_id: &str) -> Result<JobProgress> {
        self.get_json(&job_status_path(job_id)).await
    }
}
