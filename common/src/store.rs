//! 分類結果ストア
//!
//! コメント位置（0始まり）→ 分類結果 のマップ。
//! 同じ位置への再挿入は置換であり、集計は行わない（集計は aggregator の責務）。

use crate::types::ClassificationResult;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// サーバーのキー（"0", "12" など）をコメント位置に変換
pub fn parse_index(key: &str) -> Option<usize> {
    key.trim().parse().ok()
}

/// コメント位置 → 分類結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    results: BTreeMap<usize, ClassificationResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 挿入または置換。置換した場合は以前の結果を返す
    pub fn upsert(&mut self, index: usize, result: ClassificationResult) -> Option<ClassificationResult> {
        self.results.insert(index, result)
    }

    pub fn has(&self, index: usize) -> bool {
        self.results.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&ClassificationResult> {
        self.results.get(&index)
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// サーバーの結果マップ（キーは位置の文字列）を取り込む。取り込んだ件数を返す
    ///
    /// 数値でないキー・`limit` 以上の位置は読み飛ばす。
    pub fn hydrate(&mut self, results: &HashMap<String, ClassificationResult>, limit: usize) -> usize {
        let mut entries: Vec<(usize, &str, &ClassificationResult)> = Vec::with_capacity(results.len());
        for (key, result) in results {
            match parse_index(key).filter(|i| *i < limit) {
                Some(index) => entries.push((index, key.as_str(), result)),
                None => warn!(key = %key, "skipping classification result with invalid index"),
            }
        }
        // 同じ位置を指すキー（"2" と "02" など）はキー順で後のものが残る
        entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        let loaded = entries.len();
        for (index, _, result) in entries {
            self.upsert(index, result.clone());
        }
        loaded
    }

    /// 位置の昇順で列挙
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ClassificationResult)> {
        self.results.iter().map(|(index, result)| (*index, result))
    }
}

impl FromIterator<(usize, ClassificationResult)> for ResultStore {
    fn from_iter<I: IntoIterator<Item = (usize, ClassificationResult)>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
