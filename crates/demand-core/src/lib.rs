//! # Demand Core
//!
//! 需求預測核心資料模型與類型定義

pub mod calendar;
pub mod config;
pub mod metrics;
pub mod order;
pub mod projection;
pub mod series;

// Re-export 主要類型
pub use calendar::{BucketWidth, Timeframe};
pub use config::{ForecastConfig, ForecastMethod};
pub use metrics::{Outlier, OutlierKind, ProductMetrics, Trend};
pub use order::OrderRecord;
pub use projection::{ProductProjection, ProjectionPoint};
pub use series::{AggregatedPeriod, ProductSeries};

/// 預測錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("產品序列為空: {0}")]
    EmptySeries(String),

    #[error("無效的預測配置: {0}")]
    InvalidConfig(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
