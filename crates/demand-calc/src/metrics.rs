//! 產品需求統計計算

use chrono::Datelike;
use demand_core::{
    BucketWidth, ForecastError, Outlier, OutlierKind, ProductMetrics, ProductSeries, Trend,
};
use std::collections::HashMap;

use crate::statistics;

/// 判定為有趨勢所需的最低 R²
pub const TREND_MIN_R_SQUARED: f64 = 0.10;

/// 判定為有趨勢所需的最低正規化斜率（每桶 2%）
pub const TREND_MIN_NORMALIZED_SLOPE: f64 = 0.02;

/// 異常值 z 分數門檻
pub const OUTLIER_Z_THRESHOLD: f64 = 2.5;

/// 季節性指數的最低變異數
pub const SEASONALITY_MIN_VARIANCE: f64 = 0.01;

const MONTHS_PER_YEAR: usize = 12;

/// 統計計算器
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// 計算單一產品序列的統計結果
    ///
    /// 序列為空時返回 [`ForecastError::EmptySeries`]。
    pub fn compute(
        series: &ProductSeries,
        bucket_width: BucketWidth,
    ) -> demand_core::Result<ProductMetrics> {
        if series.is_empty() {
            return Err(ForecastError::EmptySeries(series.product_id.clone()));
        }

        let quantities = series.quantities();

        let mean = statistics::mean(&quantities);
        let variance = statistics::sample_variance(&quantities);
        if !mean.is_finite() || !variance.is_finite() {
            return Err(ForecastError::CalculationError(format!(
                "產品 {} 的需求統計溢位",
                series.product_id
            )));
        }
        let std_deviation = variance.sqrt();
        let coefficient_of_variation = if mean == 0.0 { 0.0 } else { std_deviation / mean };

        let fit = statistics::linear_fit(&quantities);
        let trend = classify_trend(fit.slope, fit.r_squared, mean);

        let outliers = Self::detect_outliers(series, &quantities, mean, std_deviation);
        let seasonality_index = Self::seasonality_index(series, bucket_width);

        let min_demand = quantities.iter().copied().fold(f64::INFINITY, f64::min);
        let max_demand = quantities.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        tracing::debug!(
            "產品 {} 統計: 桶數 {}, 平均 {:.2}, 趨勢 {:?} (slope {:.4}, R² {:.4}), 異常 {} 筆",
            series.product_id,
            quantities.len(),
            mean,
            trend,
            fit.slope,
            fit.r_squared,
            outliers.len()
        );

        Ok(ProductMetrics {
            period_count: quantities.len(),
            mean_demand: mean,
            avg_daily_demand: mean / bucket_width.days_per_period(),
            avg_weekly_demand: mean * bucket_width.periods_per_week(),
            avg_monthly_demand: mean * bucket_width.periods_per_month(),
            variance,
            std_deviation,
            coefficient_of_variation,
            trend,
            trend_slope: fit.slope,
            trend_intercept: fit.intercept,
            trend_strength: fit.r_squared,
            seasonality_index,
            outliers,
            min_demand,
            max_demand,
            median_demand: statistics::median(&quantities),
        })
    }

    /// 計算所有產品的統計結果
    pub fn compute_all(
        series_map: &HashMap<String, ProductSeries>,
        bucket_width: BucketWidth,
    ) -> demand_core::Result<HashMap<String, ProductMetrics>> {
        series_map
            .iter()
            .map(|(product_id, series)| {
                Self::compute(series, bucket_width).map(|m| (product_id.clone(), m))
            })
            .collect()
    }

    /// 以整條序列的平均與標準差計算 z 分數，|z| > 2.5 視為異常
    ///
    /// 標準差為 0 時不回報任何異常。
    fn detect_outliers(
        series: &ProductSeries,
        quantities: &[f64],
        mean: f64,
        std_deviation: f64,
    ) -> Vec<Outlier> {
        if std_deviation == 0.0 {
            return Vec::new();
        }

        series
            .data
            .iter()
            .zip(quantities)
            .filter_map(|(period, &quantity)| {
                let z_score = (quantity - mean) / std_deviation;
                if z_score.abs() <= OUTLIER_Z_THRESHOLD {
                    return None;
                }
                Some(Outlier {
                    period_start: period.period_start,
                    period_label: period.period_label.clone(),
                    quantity,
                    z_score,
                    kind: if z_score > 0.0 { OutlierKind::Spike } else { OutlierKind::Drop },
                })
            })
            .collect()
    }

    /// 季節性指數（每月分桶且至少 12 個桶時才計算）
    ///
    /// 12 個月份都必須有資料；指數變異數低於 0.01 時視為無季節性。
    fn seasonality_index(series: &ProductSeries, bucket_width: BucketWidth) -> Option<Vec<f64>> {
        if bucket_width != BucketWidth::Monthly || series.len() < MONTHS_PER_YEAR {
            return None;
        }

        let mut sums = [0.0_f64; MONTHS_PER_YEAR];
        let mut counts = [0_u32; MONTHS_PER_YEAR];
        for (period, quantity) in series.data.iter().zip(series.quantities()) {
            let month = period.period_start.month0() as usize;
            sums[month] += quantity;
            counts[month] += 1;
        }

        if counts.iter().any(|&c| c == 0) {
            return None;
        }

        let monthly_averages: Vec<f64> = sums
            .iter()
            .zip(counts.iter())
            .map(|(&sum, &count)| sum / count as f64)
            .collect();

        let overall = statistics::mean(&monthly_averages);
        if overall == 0.0 {
            return None;
        }

        let indices: Vec<f64> = monthly_averages.iter().map(|avg| avg / overall).collect();
        if statistics::population_variance(&indices) < SEASONALITY_MIN_VARIANCE {
            return None;
        }

        Some(indices)
    }
}

/// 趨勢分類
///
/// 斜率先以平均值正規化；只有 R² > 0.10 且 |正規化斜率| > 0.02 時才判定為上升或下降。
pub fn classify_trend(slope: f64, r_squared: f64, mean: f64) -> Trend {
    let normalized_slope = if mean == 0.0 { 0.0 } else { slope / mean };

    if r_squared > TREND_MIN_R_SQUARED && normalized_slope.abs() > TREND_MIN_NORMALIZED_SLOPE {
        if slope > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use demand_core::AggregatedPeriod;
    use rstest::rstest;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;

    const EPS: f64 = 1e-9;

    fn series_of(values: &[f64], width: BucketWidth, start: NaiveDate) -> ProductSeries {
        let mut data = Vec::new();
        let mut current = start;
        for &v in values {
            let mut period = AggregatedPeriod::empty(
                current,
                width.period_label(current),
                "SKU-001".to_string(),
                "Bike Helmet".to_string(),
            );
            period.add_order(Decimal::from_f64(v).unwrap());
            period.finalize();
            data.push(period);
            current = width.next_period(current).unwrap();
        }

        ProductSeries {
            product_id: "SKU-001".to_string(),
            product_name: "Bike Helmet".to_string(),
            category: None,
            total_orders: data.len() as u32,
            total_quantity: data.iter().map(|p| p.total_quantity).sum(),
            data,
            first_order_date: start,
            last_order_date: current,
        }
    }

    fn weekly(values: &[f64]) -> ProductSeries {
        series_of(values, BucketWidth::Weekly, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
    }

    fn monthly(values: &[f64]) -> ProductSeries {
        series_of(values, BucketWidth::Monthly, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_empty_series_is_error() {
        let series = weekly(&[]);
        let result = MetricsCalculator::compute(&series, BucketWidth::Weekly);

        assert!(matches!(result, Err(ForecastError::EmptySeries(id)) if id == "SKU-001"));
    }

    #[test]
    fn test_descriptive_statistics() {
        let series = weekly(&[4.0, 8.0, 6.0, 2.0]);
        let m = MetricsCalculator::compute(&series, BucketWidth::Weekly).unwrap();

        assert!((m.mean_demand - 5.0).abs() < EPS);
        assert!((m.variance - 20.0 / 3.0).abs() < EPS);
        assert!((m.std_deviation - (20.0f64 / 3.0).sqrt()).abs() < EPS);
        assert!((m.coefficient_of_variation - m.std_deviation / 5.0).abs() < EPS);
        assert_eq!(m.min_demand, 2.0);
        assert_eq!(m.max_demand, 8.0);
        assert_eq!(m.median_demand, 5.0);
        assert_eq!(m.period_count, 4);
    }

    #[rstest]
    #[case(BucketWidth::Daily, 14.0, 14.0, 98.0, 420.0)]
    #[case(BucketWidth::Weekly, 14.0, 2.0, 14.0, 60.62)]
    #[case(BucketWidth::Monthly, 14.0, 0.5, 3.5, 14.0)]
    fn test_rate_conversion(
        #[case] width: BucketWidth,
        #[case] mean: f64,
        #[case] daily: f64,
        #[case] weekly_rate: f64,
        #[case] monthly_rate: f64,
    ) {
        let series = series_of(&[mean, mean], width, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let m = MetricsCalculator::compute(&series, width).unwrap();

        assert!((m.avg_daily_demand - daily).abs() < 1e-6);
        assert!((m.avg_weekly_demand - weekly_rate).abs() < 1e-6);
        assert!((m.avg_monthly_demand - monthly_rate).abs() < 1e-6);
    }

    #[test]
    fn test_zero_mean_has_zero_cv() {
        let m = MetricsCalculator::compute(&weekly(&[0.0, 0.0, 0.0]), BucketWidth::Weekly).unwrap();

        assert_eq!(m.coefficient_of_variation, 0.0);
        assert_eq!(m.trend, Trend::Stable);
        assert!(m.outliers.is_empty());
    }

    #[test]
    fn test_linear_trend_increasing() {
        let m = MetricsCalculator::compute(&weekly(&[10.0, 20.0, 30.0, 40.0]), BucketWidth::Weekly)
            .unwrap();

        assert!((m.trend_slope - 10.0).abs() < EPS);
        assert!((m.trend_intercept - 10.0).abs() < EPS);
        assert!((m.trend_strength - 1.0).abs() < EPS);
        assert_eq!(m.trend, Trend::Increasing);
    }

    #[test]
    fn test_linear_trend_decreasing() {
        let m = MetricsCalculator::compute(&weekly(&[50.0, 40.0, 30.0, 20.0]), BucketWidth::Weekly)
            .unwrap();

        assert_eq!(m.trend, Trend::Decreasing);
    }

    #[test]
    fn test_single_bucket_degenerates() {
        let m = MetricsCalculator::compute(&weekly(&[12.0]), BucketWidth::Weekly).unwrap();

        assert_eq!(m.trend_slope, 0.0);
        assert_eq!(m.trend_intercept, 12.0);
        assert_eq!(m.trend_strength, 0.0);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.trend, Trend::Stable);
    }

    #[rstest]
    // 平均 100、斜率 1（正規化 0.01）、R² 0.5：斜率不足，判定為平穩
    #[case(1.0, 0.5, 100.0, Trend::Stable)]
    // 斜率足夠但 R² 不足
    #[case(5.0, 0.08, 100.0, Trend::Stable)]
    #[case(5.0, 0.5, 100.0, Trend::Increasing)]
    #[case(-5.0, 0.5, 100.0, Trend::Decreasing)]
    // 平均為 0 時正規化斜率視為 0
    #[case(3.0, 0.9, 0.0, Trend::Stable)]
    fn test_classify_trend(
        #[case] slope: f64,
        #[case] r_squared: f64,
        #[case] mean: f64,
        #[case] expected: Trend,
    ) {
        assert_eq!(classify_trend(slope, r_squared, mean), expected);
    }

    #[test]
    fn test_spike_outlier() {
        let mut values = vec![10.0; 12];
        values.push(100.0);
        let m = MetricsCalculator::compute(&weekly(&values), BucketWidth::Weekly).unwrap();

        assert_eq!(m.outliers.len(), 1);
        let outlier = &m.outliers[0];
        assert_eq!(outlier.kind, OutlierKind::Spike);
        assert_eq!(outlier.quantity, 100.0);
        assert!(outlier.z_score > OUTLIER_Z_THRESHOLD);
    }

    #[test]
    fn test_drop_outlier() {
        let mut values = vec![50.0; 12];
        values.insert(6, 0.0);
        let m = MetricsCalculator::compute(&weekly(&values), BucketWidth::Weekly).unwrap();

        assert_eq!(m.outliers.len(), 1);
        assert_eq!(m.outliers[0].kind, OutlierKind::Drop);
        assert!(m.outliers[0].z_score < -OUTLIER_Z_THRESHOLD);
    }

    #[test]
    fn test_five_point_spike_stays_below_threshold() {
        // n = 5 時樣本 z 分數最大只有 (n-1)/sqrt(n) ≈ 1.79
        let m = MetricsCalculator::compute(&weekly(&[10.0, 10.0, 10.0, 10.0, 100.0]), BucketWidth::Weekly)
            .unwrap();

        assert!(m.outliers.is_empty());
    }

    #[test]
    fn test_constant_series_has_no_outliers() {
        let m = MetricsCalculator::compute(&weekly(&[5.0, 5.0, 5.0, 5.0]), BucketWidth::Weekly)
            .unwrap();

        assert_eq!(m.std_deviation, 0.0);
        assert!(m.outliers.is_empty());
    }

    #[test]
    fn test_seasonality_detected() {
        // 12 月與 1 月旺季
        let year = [30.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 30.0];
        let values: Vec<f64> = year.iter().chain(year.iter()).copied().collect();
        let m = MetricsCalculator::compute(&monthly(&values), BucketWidth::Monthly).unwrap();

        let index = m.seasonality_index.expect("應偵測到季節性");
        assert_eq!(index.len(), 12);
        let overall = (30.0 * 2.0 + 10.0 * 10.0) / 12.0;
        assert!((index[0] - 30.0 / overall).abs() < EPS);
        assert!((index[5] - 10.0 / overall).abs() < EPS);
        assert!((index.iter().sum::<f64>() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_monthly_series_has_no_seasonality() {
        let values = vec![20.0; 12];
        let m = MetricsCalculator::compute(&monthly(&values), BucketWidth::Monthly).unwrap();

        assert!(m.seasonality_index.is_none());
    }

    #[rstest]
    #[case(12.0, false)] // 指數變異數約 0.0030
    #[case(14.0, true)] // 指數變異數約 0.0114
    fn test_seasonality_variance_threshold(#[case] december: f64, #[case] detected: bool) {
        let mut values = vec![10.0; 12];
        values[11] = december;
        let m = MetricsCalculator::compute(&monthly(&values), BucketWidth::Monthly).unwrap();

        let overall = values.iter().sum::<f64>() / 12.0;
        let indices: Vec<f64> = values.iter().map(|v| v / overall).collect();
        let variance = statistics::population_variance(&indices);
        assert!(variance > 0.0);
        assert_eq!(variance >= SEASONALITY_MIN_VARIANCE, detected);

        assert_eq!(m.seasonality_index.is_some(), detected);
    }

    #[test]
    fn test_seasonality_requires_twelve_buckets() {
        let values = [30.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 30.0];
        let m = MetricsCalculator::compute(&monthly(&values), BucketWidth::Monthly).unwrap();

        assert!(m.seasonality_index.is_none());
    }

    #[test]
    fn test_seasonality_only_for_monthly() {
        let values: Vec<f64> = (0..24).map(|i| if i % 12 == 0 { 50.0 } else { 5.0 }).collect();
        let m = MetricsCalculator::compute(&weekly(&values), BucketWidth::Weekly).unwrap();

        assert!(m.seasonality_index.is_none());
    }

    #[test]
    fn test_compute_all() {
        let mut map = HashMap::new();
        map.insert("SKU-001".to_string(), weekly(&[1.0, 2.0, 3.0]));
        let mut other = weekly(&[4.0]);
        other.product_id = "SKU-002".to_string();
        map.insert("SKU-002".to_string(), other);

        let all = MetricsCalculator::compute_all(&map, BucketWidth::Weekly).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["SKU-002"].period_count, 1);
    }
}
