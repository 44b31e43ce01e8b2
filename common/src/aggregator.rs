//! 集計ロジック
//!
//! (ResultStore, 既知カテゴリ一覧) → Aggregate を計算する唯一の関数。
//! 純粋関数なので、ポーリングのたびに再計算・再描画しても結果は変わらない。

use crate::store::ResultStore;
use crate::types::{CategoryDescriptor, SentimentLabel};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// カテゴリが一つもないときのプレースホルダ
pub const NO_DATA_LABEL: &str = "no data";

/// グラフ軸ラベルの最大文字数
pub const MAX_LABEL_CHARS: usize = 20;

/// 感情ごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentCounts {
    pub fn get(&self, label: SentimentLabel) -> u32 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }

    fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

/// カテゴリ名と件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u32,
}

/// グラフに渡す系列 `{labels, values}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// 集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// 既知カテゴリ（一覧順）→ 未知カテゴリ（初出順）
    pub categories: Vec<CategoryCount>,
    pub sentiments: SentimentCounts,
    /// 閉じた集合外の感情ラベルを持つ結果の数（感情バケットには含まない）
    pub unrecognized_sentiments: u32,
    /// ストア内の結果数
    pub classified: usize,
}

impl Aggregate {
    pub fn category_count(&self, name: &str) -> Option<u32> {
        self.categories.iter().find(|c| c.name == name).map(|c| c.count)
    }

    /// カテゴリ棒グラフ用の系列
    ///
    /// カテゴリが一つもなければ「no data」を 0 で1件だけ返す。
    pub fn category_series(&self) -> ChartSeries {
        if self.categories.is_empty() {
            return ChartSeries {
                labels: vec![NO_DATA_LABEL.to_string()],
                values: vec![0],
            };
        }

        ChartSeries {
            labels: self.categories.iter().map(|c| c.name.clone()).collect(),
            values: self.categories.iter().map(|c| c.count).collect(),
        }
    }

    /// 感情ドーナツグラフ用の系列（常に3件）
    pub fn sentiment_series(&self) -> ChartSeries {
        ChartSeries {
            labels: SentimentLabel::ALL.iter().map(|l| l.display_name().to_string()).collect(),
            values: SentimentLabel::ALL.iter().map(|l| self.sentiments.get(*l)).collect(),
        }
    }
}

/// 既知カテゴリ名（重複・空名を除き、一覧順）
pub fn known_category_names(categories: &[CategoryDescriptor]) -> Vec<String> {
    let mut seen = HashSet::new();
    categories
        .iter()
        .map(|c| c.name())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// ストアと既知カテゴリから集計を計算
pub fn aggregate(store: &ResultStore, categories: &[CategoryDescriptor]) -> Aggregate {
    let mut counts: Vec<CategoryCount> = known_category_names(categories)
        .into_iter()
        .map(|name| CategoryCount { name, count: 0 })
        .collect();
    let mut positions: HashMap<String, usize> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.clone(), i))
        .collect();

    let mut sentiments = SentimentCounts::default();
    let mut unrecognized_sentiments = 0;

    for (_, result) in store.iter() {
        if !result.category.is_empty() {
            let pos = *positions.entry(result.category.clone()).or_insert_with(|| {
                counts.push(CategoryCount {
                    name: result.category.clone(),
                    count: 0,
                });
                counts.len() - 1
            });
            counts[pos].count += 1;
        }

        match result.sentiment.label() {
            Some(label) => sentiments.bump(label),
            None => unrecognized_sentiments += 1,
        }
    }

    Aggregate {
        categories: counts,
        sentiments,
        unrecognized_sentiments,
        classified: store.len(),
    }
}

/// ツールチップ用の割合（%）。合計 0 のときは 0
pub fn share_percent(value: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64 * 1000.0).round() / 10.0
}

/// 長いカテゴリ名を軸ラベル用に短縮（17文字 + "..."）
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}
