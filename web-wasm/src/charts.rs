//! グラフ描画（JavaScript Bridge）
//!
//! Chart.js のインスタンス管理は js/charts.js 側で行い、
//! Rust からは `{labels, values}` 形式の系列だけを渡す。

use classify_common::aggregator::{share_percent, truncate_label};
use classify_common::Aggregate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub const CATEGORY_CANVAS_ID: &str = "categoriesChart";
pub const SENTIMENT_CANVAS_ID: &str = "sentimentChart";

// ============================================
// データ型定義
// ============================================

/// JavaScript側に渡すグラフ系列
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsChartData {
    pub labels: Vec<String>,
    /// 軸ラベル用に短縮したラベル
    pub short_labels: Vec<String>,
    pub values: Vec<u32>,
    /// ツールチップ用の割合（%）
    pub percentages: Vec<f64>,
}

impl JsChartData {
    pub fn categories(aggregate: &Aggregate) -> Self {
        let series = aggregate.category_series();
        let total: u32 = series.values.iter().sum();
        Self {
            short_labels: series.labels.iter().map(|l| truncate_label(l)).collect(),
            percentages: series.values.iter().map(|v| share_percent(*v, total)).collect(),
            labels: series.labels,
            values: series.values,
        }
    }

    pub fn sentiments(aggregate: &Aggregate) -> Self {
        let series = aggregate.sentiment_series();
        let total: u32 = series.values.iter().sum();
        Self {
            short_labels: series.labels.clone(),
            percentages: series.values.iter().map(|v| share_percent(*v, total)).collect(),
            labels: series.labels,
            values: series.values,
        }
    }
}

// ============================================
// JavaScript関数のextern宣言
// ============================================

#[wasm_bindgen(module = "/js/charts.js")]
extern "C" {
    /// 棒グラフを作成または更新（canvas がなければ何もしない）
    #[wasm_bindgen(js_name = "renderBarChart", catch)]
    fn render_bar_chart_js(canvas_id: &str, data: JsValue) -> Result<(), JsValue>;

    /// ドーナツグラフを作成または更新
    #[wasm_bindgen(js_name = "renderDoughnutChart", catch)]
    fn render_doughnut_chart_js(canvas_id: &str, data: JsValue) -> Result<(), JsValue>;
}

/// 集計から2つのグラフを描画
pub fn render(aggregate: &Aggregate) -> Result<(), JsValue> {
    let categories = serde_wasm_bindgen::to_value(&JsChartData::categories(aggregate))?;
    render_bar_chart_js(CATEGORY_CANVAS_ID, categories)?;

    let sentiments = serde_wasm_bindgen::to_value(&JsChartData::sentiments(aggregate))?;
    render_doughnut_chart_js(SENTIMENT_CANVAS_ID, sentiments)?;
    Ok(())
}
