//! DOM への描画
//!
//! コメントごとに `result-{i}`（結果表示）と `[data-comment-id="{i}"]`（項目）を持つページを前提とする。
//! 要素が見つからない場合は何もしない。

use crate::charts;
use crate::log_warn;
use classify_common::{Aggregate, Badge, BulkState, ClassificationResult, Presenter};
use gloo::timers::callback::Timeout;
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement};

pub const CLASSIFY_ALL_BUTTON_ID: &str = "classifyAllBtn";
pub const RESET_BUTTON_IDS: [&str; 2] = ["resetBtn", "resetBtnBottom"];
pub const COMMENT_ITEM_SELECTOR: &str = ".comment-item-classification";

const CLASSIFYING_CLASS: &str = "classifying";
const CLASSIFIED_CLASS: &str = "classified";

pub fn result_element_id(index: usize) -> String {
    format!("result-{}", index)
}

pub fn comment_selector(index: usize) -> String {
    format!("[data-comment-id=\"{}\"]", index)
}

/// HTML特殊文字のエスケープ
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn badge_html(badge: &Badge) -> String {
    format!(
        "<span class=\"category\">{}</span> <span class=\"{}\">{}</span>",
        escape_html(&badge.category),
        escape_html(&badge.sentiment_class),
        escape_html(&badge.sentiment_text)
    )
}

pub fn error_html(message: &str) -> String {
    format!("<span class=\"classification-error\">Error: {}</span>", escape_html(message))
}

/// ページ上の結果表示・グラフ・ボタン
#[derive(Debug, Clone)]
pub struct DomPresenter {
    document: Document,
}

impl DomPresenter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// 現在のウィンドウの document から生成
    pub fn from_window() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(Self::new)
    }

    fn result_element(&self, index: usize) -> Option<Element> {
        self.document.get_element_by_id(&result_element_id(index))
    }

    fn comment_element(&self, index: usize) -> Option<Element> {
        self.document.query_selector(&comment_selector(index)).ok().flatten()
    }

    fn set_item_class(&self, index: usize, add: Option<&str>) {
        let Some(element) = self.comment_element(index) else {
            return;
        };
        let classes = element.class_list();
        let _ = classes.remove_2(CLASSIFYING_CLASS, CLASSIFIED_CLASS);
        if let Some(class) = add {
            let _ = classes.add_1(class);
        }
    }
}

impl Presenter for DomPresenter {
    fn show_pending(&self, index: usize) {
        if let Some(element) = self.result_element(index) {
            element.set_inner_html("<em>Classifying...</em>");
        }
        self.set_item_class(index, Some(CLASSIFYING_CLASS));
    }

    fn show_result(&self, index: usize, result: &ClassificationResult) {
        if let Some(element) = self.result_element(index) {
            element.set_inner_html(&badge_html(&Badge::from_result(result)));
        }
        self.set_item_class(index, Some(CLASSIFIED_CLASS));
    }

    fn show_item_error(&self, index: usize, message: &str) {
        if let Some(element) = self.result_element(index) {
            element.set_inner_html(&error_html(message));
        }
        self.set_item_class(index, None);
    }

    fn clear_items(&self, count: usize) {
        for index in 0..count {
            if let Some(element) = self.result_element(index) {
                element.set_inner_html("");
            }
            self.set_item_class(index, None);
        }
    }

    fn render_charts(&self, aggregate: &Aggregate) {
        if let Err(e) = charts::render(aggregate) {
            log_warn(&format!("グラフ描画に失敗: {:?}", e));
        }
    }

    fn set_bulk_state(&self, state: BulkState) {
        let Some(button) = self
            .document
            .get_element_by_id(CLASSIFY_ALL_BUTTON_ID)
            .and_then(|e| e.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        match state {
            BulkState::Running => {
                button.set_disabled(true);
                button.set_text_content(Some("Classifying..."));
            }
            BulkState::Finished => {
                button.set_disabled(false);
                button.set_text_content(Some("✅ All classified"));
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn schedule_reload(&self, delay: Duration) {
        schedule_reload(delay);
    }
}

/// ページの再読み込みを予約
pub fn schedule_reload(delay: Duration) {
    let reload = || {
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    };
    if delay.is_zero() {
        reload();
        return;
    }
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    Timeout::new(millis, reload).forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use classify_common::{Sentiment, SentimentLabel};

    #[test]
    fn test_element_ids() {
        assert_eq!(result_element_id(4), "result-4");
        assert_eq!(comment_selector(4), "[data-comment-id=\"4\"]");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape_html("Obsługa"), "Obsługa");
    }

    #[test]
    fn test_badge_html() {
        let badge = Badge::from_result(&ClassificationResult::new("Cena", SentimentLabel::Positive));
        assert_eq!(
            badge_html(&badge),
            "<span class=\"category\">Cena</span> <span class=\"sentiment sentiment-pozytywny\">😊 Positive</span>"
        );
    }

    #[test]
    fn test_badge_html_escapes_server_text() {
        let result = ClassificationResult {
            category: "<img src=x>".to_string(),
            sentiment: Sentiment::Unrecognized("mixed".to_string()),
        };
        let html = badge_html(&Badge::from_result(&result));
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains("❓ mixed"));
    }

    #[test]
    fn test_error_html() {
        assert_eq!(
            error_html("Job not found"),
            "<span class=\"classification-error\">Error: Job not found</span>"
        );
    }
}
