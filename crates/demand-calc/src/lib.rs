//! # Demand Calculation Engine
//!
//! 需求預測計算引擎：彙總 → 統計 → 預測

pub mod aggregator;
pub mod engine;
pub mod forecaster;
pub mod metrics;
pub mod replenishment;
pub mod statistics;
pub mod t_table;

use demand_core::{
    BucketWidth, ForecastConfig, OrderRecord, ProductMetrics, ProductProjection, ProductSeries,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Re-export 主要類型
pub use aggregator::Aggregator;
pub use engine::ForecastEngine;
pub use forecaster::Forecaster;
pub use metrics::MetricsCalculator;
pub use replenishment::ReorderPlan;

/// 依產品彙總訂單
pub fn aggregate(orders: &[OrderRecord], bucket_width: BucketWidth) -> HashMap<String, ProductSeries> {
    Aggregator::aggregate(orders, bucket_width)
}

/// 計算單一產品序列的統計結果
pub fn compute_metrics(
    series: &ProductSeries,
    bucket_width: BucketWidth,
) -> demand_core::Result<ProductMetrics> {
    MetricsCalculator::compute(series, bucket_width)
}

/// 計算所有產品的統計結果
pub fn compute_all_metrics(
    series_map: &HashMap<String, ProductSeries>,
    bucket_width: BucketWidth,
) -> demand_core::Result<HashMap<String, ProductMetrics>> {
    MetricsCalculator::compute_all(series_map, bucket_width)
}

/// 產生單一產品的預測結果
pub fn project(
    series: &ProductSeries,
    metrics: &ProductMetrics,
    config: &ForecastConfig,
    bucket_width: BucketWidth,
) -> ProductProjection {
    Forecaster::project(series, metrics, config, bucket_width)
}

/// 產生所有產品的預測結果（按產品ID排序）
pub fn project_all(
    series_map: &HashMap<String, ProductSeries>,
    metrics_map: &HashMap<String, ProductMetrics>,
    config: &ForecastConfig,
    bucket_width: BucketWidth,
) -> Vec<ProductProjection> {
    Forecaster::project_all(series_map, metrics_map, config, bucket_width)
}

/// 預測計算結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// 各產品預測（按產品ID排序）
    pub projections: Vec<ProductProjection>,

    /// 警告信息
    pub warnings: Vec<ForecastWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl ForecastResult {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            projections: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ForecastWarning) {
        self.warnings.push(warning);
    }

    /// 查詢單一產品的預測
    pub fn projection(&self, product_id: &str) -> Option<&ProductProjection> {
        self.projections.iter().find(|p| p.product_id == product_id)
    }

    /// 查詢單一產品的警告
    pub fn warnings_for<'a>(&'a self, product_id: &'a str) -> impl Iterator<Item = &'a ForecastWarning> {
        self.warnings.iter().filter(move |w| w.product_id == product_id)
    }
}

/// 預測警告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastWarning {
    pub product_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ForecastWarning {
    pub fn new(product_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            product_id,
            message,
            severity,
        }
    }

    pub fn info(product_id: String, message: String) -> Self {
        Self::new(product_id, message, WarningSeverity::Info)
    }

    pub fn warning(product_id: String, message: String) -> Self {
        Self::new(product_id, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
