//! # Demand
//!
//! 需求預測引擎：將歷史訂單彙總為每個產品的連續時間序列，計算統計與趨勢，
//! 並產生附信賴區間的需求預測與補貨建議。
//!
//! ```
//! use chrono::NaiveDate;
//! use demand::{BucketWidth, ForecastConfig, ForecastEngine, ForecastMethod, OrderRecord};
//! use rust_decimal::Decimal;
//!
//! let orders = vec![
//!     OrderRecord::new(
//!         NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
//!         "SKU-001".to_string(),
//!         "Bike Helmet".to_string(),
//!         Decimal::from(10),
//!     ),
//!     OrderRecord::new(
//!         NaiveDate::from_ymd_opt(2025, 10, 13).unwrap(),
//!         "SKU-001".to_string(),
//!         "Bike Helmet".to_string(),
//!         Decimal::from(20),
//!     ),
//! ];
//!
//! let config = ForecastConfig::new(ForecastMethod::SimpleMovingAverage)
//!     .with_periods(2)
//!     .with_timeframe("4 weeks");
//! let engine = ForecastEngine::new(config, BucketWidth::Weekly).unwrap();
//! let result = engine.run(&orders).unwrap();
//!
//! assert_eq!(result.projections[0].forecast.len(), 4);
//! assert_eq!(result.projections[0].forecast[0].demand, Decimal::from(15));
//! ```

pub use demand_cache::{DirtyTracker, IncrementalForecaster};
pub use demand_calc::{
    aggregate, compute_all_metrics, compute_metrics, project, project_all, Aggregator,
    ForecastEngine, ForecastResult, ForecastWarning, Forecaster, MetricsCalculator,
    WarningSeverity,
};
pub use demand_core::{
    AggregatedPeriod, BucketWidth, ForecastConfig, ForecastError, ForecastMethod, OrderRecord,
    Outlier, OutlierKind, ProductMetrics, ProductProjection, ProductSeries, ProjectionPoint,
    Result, Timeframe, Trend,
};
