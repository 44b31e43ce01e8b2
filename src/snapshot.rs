//! ページスナップショット（ブラウザの初期データと同じJSON）の読み書き

use crate::error::{SyncError, Result};
use classify_common::{ClassificationSession, PageData};
use std::collections::HashMap;
use std::path::Path;

pub fn load_snapshot(path: &Path) -> Result<PageData> {
    if !path.exists() {
        return Err(SyncError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let page: PageData = serde_json::from_str(&content)?;
    if page.job_id.trim().is_empty() {
        return Err(SyncError::InvalidSnapshot("job_id が空です".into()));
    }
    Ok(page)
}

/// セッションの現在の状態をページデータに戻す
pub fn to_page(session: &ClassificationSession) -> PageData {
    let classifications: HashMap<String, _> = session
        .store()
        .iter()
        .map(|(index, result)| (index.to_string(), result.clone()))
        .collect();

    PageData {
        job_id: session.job_id().to_string(),
        comments: session.comments().to_vec(),
        categories: session.categories().to_vec(),
        classifications,
    }
}

pub fn save_snapshot(path: &Path, session: &ClassificationSession) -> Result<()> {
    let content = serde_json::to_string_pretty(&to_page(session))?;
    std::fs::write(path, content)?;
    Ok(())
}
