//! 需求預測
//!
//! 依配置的方法（SMA / WMA / 線性迴歸）產生未來時間桶的預測值與信賴區間，
//! 並推導補貨建議。所有輸出只在最後一步四捨五入到兩位小數。

use demand_core::{
    BucketWidth, ForecastConfig, ForecastMethod, ProductMetrics, ProductProjection,
    ProductSeries, ProjectionPoint,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::replenishment::ReorderPlan;
use crate::{statistics, t_table};

/// 單一未來時間桶的原始預測（未四捨五入）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastValue {
    pub demand: f64,
    pub standard_error: f64,
}

impl ForecastValue {
    const ZERO: ForecastValue = ForecastValue {
        demand: 0.0,
        standard_error: 0.0,
    };
}

/// 需求預測器
pub struct Forecaster;

impl Forecaster {
    /// 產生單一產品的預測結果
    pub fn project(
        series: &ProductSeries,
        metrics: &ProductMetrics,
        config: &ForecastConfig,
        bucket_width: BucketWidth,
    ) -> ProductProjection {
        let values = series.quantities();
        let horizon = bucket_width.horizon_buckets(&config.timeframe);

        // 只為日曆實際能產生的時間桶計算預測
        let anchor = series.last_period_start().unwrap_or(series.last_order_date);
        let future_periods = bucket_width.following_periods(anchor, horizon);
        let raw = Self::forecast_values(&values, metrics, config, future_periods.len());

        let degrees_of_freedom = values.len().saturating_sub(1) as u32;
        let t = t_table::t_critical(config.confidence_level, degrees_of_freedom);

        let historical: Vec<ProjectionPoint> = series
            .data
            .iter()
            .map(|p| {
                ProjectionPoint::historical(
                    p.period_start,
                    p.period_label.clone(),
                    p.total_quantity
                        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                )
            })
            .collect();

        let forecast: Vec<ProjectionPoint> = future_periods
            .iter()
            .zip(raw.iter())
            .map(|(&start, value)| {
                let margin = t * value.standard_error;
                ProjectionPoint::forecast(
                    start,
                    bucket_width.period_label(start),
                    round_for_display(value.demand),
                    round_for_display((value.demand - margin).max(0.0)),
                    round_for_display(value.demand + margin),
                )
            })
            .collect();

        let total: f64 = raw.iter().map(|v| v.demand).sum();
        let average = if forecast.is_empty() {
            0.0
        } else {
            total / forecast.len() as f64
        };
        let plan = ReorderPlan::compute(average, total, metrics.avg_daily_demand, config);

        tracing::debug!(
            "產品 {} 預測 ({}): {} 桶, 總需求 {:.2}, t = {}",
            series.product_id,
            config.method,
            forecast.len(),
            total,
            t
        );

        ProductProjection {
            product_id: series.product_id.clone(),
            product_name: series.product_name.clone(),
            category: series.category.clone(),
            historical,
            forecast,
            total_projected_demand: round_for_display(total),
            avg_projected_demand: round_for_display(average),
            safety_stock: round_for_display(plan.safety_stock),
            reorder_point: round_for_display(plan.reorder_point),
            suggested_reorder_qty: round_for_display(plan.suggested_reorder_qty),
            confidence_level: config.confidence_level,
            method: config.method,
            metrics: metrics.clone(),
        }
    }

    /// 產生所有產品的預測結果，按產品ID排序
    ///
    /// 缺少統計結果的產品會被略過。
    pub fn project_all(
        series_map: &HashMap<String, ProductSeries>,
        metrics_map: &HashMap<String, ProductMetrics>,
        config: &ForecastConfig,
        bucket_width: BucketWidth,
    ) -> Vec<ProductProjection> {
        let mut projections: Vec<ProductProjection> = series_map
            .iter()
            .filter_map(|(product_id, series)| match metrics_map.get(product_id) {
                Some(metrics) => Some(Self::project(series, metrics, config, bucket_width)),
                None => {
                    tracing::debug!("產品 {} 沒有統計結果，跳過預測", product_id);
                    None
                }
            })
            .collect();

        projections.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        projections
    }

    /// 依預測方法產生原始預測值
    pub fn forecast_values(
        values: &[f64],
        metrics: &ProductMetrics,
        config: &ForecastConfig,
        horizon: usize,
    ) -> Vec<ForecastValue> {
        match config.method {
            ForecastMethod::SimpleMovingAverage => {
                Self::simple_moving_average(values, config.periods, horizon)
            }
            ForecastMethod::WeightedMovingAverage => {
                Self::weighted_moving_average(values, config.periods, horizon)
            }
            ForecastMethod::LinearRegression => Self::linear_regression(values, metrics, horizon),
        }
    }

    /// 簡單移動平均：取最後 min(periods, n) 個值的平均，整個時界維持不變
    fn simple_moving_average(values: &[f64], periods: usize, horizon: usize) -> Vec<ForecastValue> {
        let window = Self::window(values, periods);
        if window.is_empty() {
            return vec![ForecastValue::ZERO; horizon];
        }

        let demand = statistics::mean(window);
        let standard_error =
            statistics::sample_std_dev(window) / (window.len() as f64).sqrt();

        vec![ForecastValue { demand, standard_error }; horizon]
    }

    /// 加權移動平均：權重 1, 2, …, n，越近期權重越高
    ///
    /// 標準誤 = sqrt(加權變異數) / sqrt(窗口大小)。分母使用窗口大小而非權重總和，
    /// 保留既有信賴區間的數值。
    fn weighted_moving_average(
        values: &[f64],
        periods: usize,
        horizon: usize,
    ) -> Vec<ForecastValue> {
        let window = Self::window(values, periods);
        if window.is_empty() {
            return vec![ForecastValue::ZERO; horizon];
        }

        let weights: Vec<f64> = (1..=window.len()).map(|w| w as f64).collect();
        let weight_sum: f64 = weights.iter().sum();

        let demand = window
            .iter()
            .zip(&weights)
            .map(|(v, w)| v * w)
            .sum::<f64>()
            / weight_sum;

        let weighted_variance = window
            .iter()
            .zip(&weights)
            .map(|(v, w)| w * (v - demand).powi(2))
            .sum::<f64>()
            / weight_sum;

        let standard_error = weighted_variance.sqrt() / (window.len() as f64).sqrt();

        vec![ForecastValue { demand, standard_error }; horizon]
    }

    /// 線性迴歸：沿用統計階段的最小平方擬合，外推到索引 n, n+1, …
    ///
    /// 預測值不低於 0；標準誤依距離歷史索引平均值的遠近擴大：
    /// se = s × sqrt(1 + 1/n + (x - x̄)² / Σ(xᵢ - x̄)²)
    fn linear_regression(
        values: &[f64],
        metrics: &ProductMetrics,
        horizon: usize,
    ) -> Vec<ForecastValue> {
        let n = values.len();
        if n == 0 {
            return vec![ForecastValue::ZERO; horizon];
        }

        let x_mean = (n - 1) as f64 / 2.0;
        let sxx: f64 = (0..n).map(|i| (i as f64 - x_mean).powi(2)).sum();
        let residual_se =
            statistics::residual_std_error(values, metrics.trend_slope, metrics.trend_intercept);

        (0..horizon)
            .map(|h| {
                let x = (n + h) as f64;
                let demand = metrics.trend_value_at(x).max(0.0);
                let leverage = if sxx == 0.0 {
                    0.0
                } else {
                    (x - x_mean).powi(2) / sxx
                };
                let standard_error = residual_se * (1.0 + 1.0 / n as f64 + leverage).sqrt();
                ForecastValue { demand, standard_error }
            })
            .collect()
    }

    /// 最後 min(periods, n) 個歷史值
    fn window(values: &[f64], periods: usize) -> &[f64] {
        let size = periods.min(values.len());
        &values[values.len() - size..]
    }
}

/// 將計算結果轉為兩位小數的 Decimal（只在輸出邊界使用）
pub fn round_for_display(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
