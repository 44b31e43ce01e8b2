//! 分類セッション
//!
//! 画面（ページ）単位の状態: ジョブID・コメント一覧・既知カテゴリ・結果ストア・
//! 一括分類中フラグ。ページコントローラが1つ生成し、各コンポーネントへ参照で渡す。

use crate::aggregator::{aggregate, Aggregate};
use crate::store::ResultStore;
use crate::types::{CategoryDescriptor, ClassificationResult, Comment};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;

/// ページ読み込み時にテンプレートから渡されるデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    pub job_id: String,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub categories: Vec<CategoryDescriptor>,

    /// 既存の分類結果（キーはコメント位置の文字列）
    #[serde(default, alias = "existing_classifications")]
    pub classifications: HashMap<String, ClassificationResult>,
}

/// 分類セッション
#[derive(Debug)]
pub struct ClassificationSession {
    job_id: String,
    comments: Vec<Comment>,
    categories: Vec<CategoryDescriptor>,
    store: RefCell<ResultStore>,
    /// リセットのたびに進む世代番号
    generation: Cell<u64>,
    bulk_running: Cell<bool>,
}

impl ClassificationSession {
    pub fn new(job_id: impl Into<String>, comments: Vec<Comment>, categories: Vec<CategoryDescriptor>) -> Self {
        Self {
            job_id: job_id.into(),
            comments,
            categories,
            store: RefCell::new(ResultStore::new()),
            generation: Cell::new(0),
            bulk_running: Cell::new(false),
        }
    }

    /// ページデータから生成し、既存結果を取り込む
    pub fn from_page(page: PageData) -> Self {
        let session = Self::new(page.job_id, page.comments, page.categories);
        session.hydrate(&page.classifications);
        session
    }

    /// サーバーの結果マップを取り込む。取り込んだ件数を返す
    ///
    /// 数値でないキー・コメント一覧の範囲外のキーは読み飛ばす。
    pub fn hydrate(&self, results: &HashMap<String, ClassificationResult>) -> usize {
        self.store.borrow_mut().hydrate(results, self.comments.len())
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    pub fn comment_text(&self, index: usize) -> Option<&str> {
        self.comments.get(index).map(Comment::body)
    }

    pub fn categories(&self) -> &[CategoryDescriptor] {
        &self.categories
    }

    /// ストアの読み取り（await をまたいで保持しないこと）
    pub fn store(&self) -> Ref<'_, ResultStore> {
        self.store.borrow()
    }

    pub fn has_result(&self, index: usize) -> bool {
        self.store.borrow().has(index)
    }

    pub fn result(&self, index: usize) -> Option<ClassificationResult> {
        self.store.borrow().get(index).cloned()
    }

    pub fn upsert(&self, index: usize, result: ClassificationResult) -> Option<ClassificationResult> {
        self.store.borrow_mut().upsert(index, result)
    }

    /// 未保持の場合のみ挿入。挿入したら true
    pub fn insert_missing(&self, index: usize, result: &ClassificationResult) -> bool {
        let mut store = self.store.borrow_mut();
        if store.has(index) {
            return false;
        }
        store.upsert(index, result.clone());
        true
    }

    /// 全結果を破棄し、世代を進める
    pub fn clear_results(&self) {
        self.store.borrow_mut().clear();
        self.generation.set(self.generation.get() + 1);
    }

    /// 現在の世代。取得開始時と比べて、リセット前の応答かどうかを判定する
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn classified_count(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn aggregate(&self) -> Aggregate {
        aggregate(&self.store.borrow(), &self.categories)
    }

    /// 全コメントが分類済み（コメント0件は未完了扱い）
    pub fn is_complete(&self) -> bool {
        let total = self.comment_count();
        total > 0 && self.classified_count() == total
    }

    /// 一括分類を開始。実行中なら None
    pub fn try_begin_bulk(&self) -> Option<BulkGuard<'_>> {
        if self.bulk_running.replace(true) {
            return None;
        }
        Some(BulkGuard { flag: &self.bulk_running })
    }

    pub fn is_bulk_running(&self) -> bool {
        self.bulk_running.get()
    }
}

/// 一括分類中フラグ。drop で解除される
pub struct BulkGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for BulkGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
