//! 分類結果の型定義
//!
//! ブラウザ(WASM)とCLIで共有される型:
//! - SentimentLabel / Sentiment: 感情ラベル（閉じた3値 + 未知値の保持）
//! - ClassificationResult: 1コメントの分類結果
//! - CategoryDescriptor: サーバーが割り当て可能なカテゴリ（アスペクト）
//! - Comment: 分類対象のコメント

use serde::{Deserialize, Deserializer, Serialize};

/// null を既定値として扱うデシリアライザ
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 感情ラベル（閉じた集合）
///
/// サーバーはポーランド語 (`pozytywny` / `neutralny` / `negatywny`) で返すが、
/// 英語表記も受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "pozytywny", alias = "positive")]
    Positive,
    #[serde(rename = "neutralny", alias = "neutral")]
    Neutral,
    #[serde(rename = "negatywny", alias = "negative")]
    Negative,
}

impl SentimentLabel {
    /// グラフ表示順
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// 大文字小文字・前後空白を無視してパース
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pozytywny" | "positive" => Some(SentimentLabel::Positive),
            "neutralny" | "neutral" => Some(SentimentLabel::Neutral),
            "negatywny" | "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }

    /// サーバーとの通信で使う表記
    pub fn wire_name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "pozytywny",
            SentimentLabel::Neutral => "neutralny",
            SentimentLabel::Negative => "negatywny",
        }
    }

    /// 画面表示用ラベル
    pub fn display_name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "😊",
            SentimentLabel::Neutral => "😐",
            SentimentLabel::Negative => "😞",
        }
    }
}

/// 結果に付与された感情
///
/// 閉じた集合外の値は `Unrecognized` として原文のまま保持する。
/// 集計では感情バケットに加算しない（カテゴリ側には計上される）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Sentiment {
    Known(SentimentLabel),
    Unrecognized(String),
}

impl Sentiment {
    pub fn label(&self) -> Option<SentimentLabel> {
        match self {
            Sentiment::Known(label) => Some(*label),
            Sentiment::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Known(label) => label.wire_name(),
            Sentiment::Unrecognized(raw) => raw,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Sentiment::Unrecognized(raw) if raw.trim().is_empty())
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Unrecognized(String::new())
    }
}

impl From<SentimentLabel> for Sentiment {
    fn from(label: SentimentLabel) -> Self {
        Sentiment::Known(label)
    }
}

impl From<Option<String>> for Sentiment {
    fn from(value: Option<String>) -> Self {
        let raw = value.unwrap_or_default();
        match SentimentLabel::parse(&raw) {
            Some(label) => Sentiment::Known(label),
            None => Sentiment::Unrecognized(raw),
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.as_str().to_string()
    }
}

/// 1コメントの分類結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    #[serde(default)]
    pub sentiment: Sentiment,
}

impl ClassificationResult {
    pub fn new(category: impl Into<String>, sentiment: impl Into<Sentiment>) -> Self {
        Self {
            category: category.into(),
            sentiment: sentiment.into(),
        }
    }

    /// カテゴリも感情も空（中身のないレスポンス）
    pub fn is_blank(&self) -> bool {
        self.category.trim().is_empty() && self.sentiment.is_missing()
    }
}

/// 受信時の生フォーマット（文字列 or オブジェクト）
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Name(String),
    Object {
        #[serde(default, alias = "aspect")]
        aspekt: Option<String>,
        #[serde(default, alias = "definition")]
        definicja: Option<String>,
    },
}

/// サーバーが割り当て可能なカテゴリ
///
/// 受信時は `"Obsługa"` のような文字列、または `aspekt` / `aspect` のどちらかの
/// キーに名前を持つオブジェクトを受け付け、ここで一つのフィールドに正規化する。
/// 送信時はサーバーの表記 (`aspekt`, `definicja`) で書き出す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategory")]
pub struct CategoryDescriptor {
    #[serde(rename = "aspekt")]
    pub aspect: String,

    #[serde(rename = "definicja", skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl CategoryDescriptor {
    pub fn new(aspect: impl Into<String>) -> Self {
        Self {
            aspect: aspect.into(),
            definition: None,
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.aspect
    }
}

impl From<RawCategory> for CategoryDescriptor {
    fn from(raw: RawCategory) -> Self {
        match raw {
            RawCategory::Name(aspect) => Self { aspect, definition: None },
            RawCategory::Object { aspekt, definicja } => Self {
                aspect: aspekt.unwrap_or_default(),
                definition: definicja,
            },
        }
    }
}

/// 分類対象コメント
///
/// 本文は `text`、なければ `comment_text` に入っている。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            comment_text: None,
        }
    }

    /// 本文（空の `text` は `comment_text` にフォールバック）
    pub fn body(&self) -> &str {
        [self.text.as_deref(), self.comment_text.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}
