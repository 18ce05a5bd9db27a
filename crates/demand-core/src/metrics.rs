//! 產品需求統計模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 需求趨勢
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// 異常值類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierKind {
    /// 需求暴增
    Spike,
    /// 需求驟降
    Drop,
}

/// 被標記為異常的時間桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    pub period_start: NaiveDate,
    pub period_label: String,
    pub quantity: f64,
    pub z_score: f64,
    pub kind: OutlierKind,
}

/// 單一產品序列的統計結果
///
/// 所有數值保留完整精度，只在輸出預測結果時才四捨五入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    /// 時間桶數量
    pub period_count: usize,

    /// 每桶平均需求
    pub mean_demand: f64,

    /// 日平均需求
    pub avg_daily_demand: f64,

    /// 週平均需求
    pub avg_weekly_demand: f64,

    /// 月平均需求
    pub avg_monthly_demand: f64,

    /// 樣本變異數（n-1）
    pub variance: f64,

    /// 標準差
    pub std_deviation: f64,

    /// 變異係數（標準差 / 平均）
    pub coefficient_of_variation: f64,

    /// 趨勢分類
    pub trend: Trend,

    /// 迴歸斜率（每桶變化量）
    pub trend_slope: f64,

    /// 迴歸截距
    pub trend_intercept: f64,

    /// 趨勢強度（R²，0-1）
    pub trend_strength: f64,

    /// 季節性指數（12 個月，僅每月分桶且資料滿 12 個月時提供）
    pub seasonality_index: Option<Vec<f64>>,

    /// 異常時間桶
    pub outliers: Vec<Outlier>,

    pub min_demand: f64,
    pub max_demand: f64,
    pub median_demand: f64,
}

impl ProductMetrics {
    /// 檢查是否偵測到季節性
    pub fn has_seasonality(&self) -> bool {
        self.seasonality_index.is_some()
    }

    /// 檢查是否有異常值
    pub fn has_outliers(&self) -> bool {
        !self.outliers.is_empty()
    }

    /// 迴歸線在指定桶索引的值
    pub fn trend_value_at(&self, index: f64) -> f64 {
        self.trend_intercept + self.trend_slope * index
    }
}
