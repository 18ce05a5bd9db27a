//! 預測輸出模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ForecastMethod;
use crate::metrics::ProductMetrics;

/// 單一時間桶的輸出點（歷史或預測）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period_start: NaiveDate,
    pub period_label: String,

    /// 需求值（兩位小數）
    pub demand: Decimal,

    /// 信賴區間下限（歷史點等於需求值）
    pub confidence_low: Decimal,

    /// 信賴區間上限（歷史點等於需求值）
    pub confidence_high: Decimal,

    pub is_forecast: bool,
}

impl ProjectionPoint {
    /// 創建歷史點
    pub fn historical(period_start: NaiveDate, period_label: String, demand: Decimal) -> Self {
        Self {
            period_start,
            period_label,
            demand,
            confidence_low: demand,
            confidence_high: demand,
            is_forecast: false,
        }
    }

    /// 創建預測點
    pub fn forecast(
        period_start: NaiveDate,
        period_label: String,
        demand: Decimal,
        confidence_low: Decimal,
        confidence_high: Decimal,
    ) -> Self {
        Self {
            period_start,
            period_label,
            demand,
            confidence_low,
            confidence_high,
            is_forecast: true,
        }
    }

    /// 信賴區間寬度
    pub fn interval_width(&self) -> Decimal {
        self.confidence_high - self.confidence_low
    }
}

/// 單一產品的最終預測結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProjection {
    pub product_id: String,
    pub product_name: String,
    pub category: Option<String>,

    /// 歷史點
    pub historical: Vec<ProjectionPoint>,

    /// 預測點
    pub forecast: Vec<ProjectionPoint>,

    /// 預測期間總需求
    pub total_projected_demand: Decimal,

    /// 預測期間每桶平均需求
    pub avg_projected_demand: Decimal,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 再訂購點
    pub reorder_point: Decimal,

    /// 建議訂購量
    pub suggested_reorder_qty: Decimal,

    pub confidence_level: f64,
    pub method: ForecastMethod,

    /// 計算時使用的統計結果
    pub metrics: ProductMetrics,
}

impl ProductProjection {
    /// 預測時間桶數量
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    /// 歷史與預測點依時間串接
    pub fn points(&self) -> impl Iterator<Item = &ProjectionPoint> {
        self.historical.iter().chain(self.forecast.iter())
    }
}
