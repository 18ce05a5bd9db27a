//! 預測主計算器

use demand_core::{BucketWidth, ForecastConfig, ForecastMethod, OrderRecord, ProductProjection, ProductSeries};
use rayon::prelude::*;

use crate::aggregator::Aggregator;
use crate::forecaster::Forecaster;
use crate::metrics::MetricsCalculator;
use crate::{ForecastResult, ForecastWarning};

/// 線性迴歸建議的最少歷史桶數（少於此數無法估計殘差）
const MIN_REGRESSION_PERIODS: usize = 3;

/// 單一產品的預測與警告
#[derive(Debug, Clone)]
pub struct ProductForecast {
    pub projection: ProductProjection,
    pub warnings: Vec<ForecastWarning>,
}

/// 預測計算器：彙總 → 統計 → 預測
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    /// 預測配置（已驗證）
    config: ForecastConfig,

    /// 時間分桶寬度
    bucket_width: BucketWidth,
}

impl ForecastEngine {
    /// 創建新的預測計算器（配置不合法時返回錯誤）
    pub fn new(config: ForecastConfig, bucket_width: BucketWidth) -> demand_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bucket_width,
        })
    }

    /// 主預測入口
    pub fn run(&self, orders: &[OrderRecord]) -> demand_core::Result<ForecastResult> {
        tracing::info!(
            "開始需求預測：訂單 {} 筆，分桶 {}，方法 {}，時界 {}",
            orders.len(),
            self.bucket_width,
            self.config.method,
            self.config.timeframe
        );

        let start_time = std::time::Instant::now();

        // Step 1: 時間分桶彙總
        tracing::debug!("Step 1: 時間分桶彙總");
        let series_map = Aggregator::aggregate(orders, self.bucket_width);
        tracing::debug!("產品數量: {}", series_map.len());

        // Step 2 & 3: 逐產品統計與預測（產品之間互不相依，可並行）
        tracing::debug!("Step 2: 逐產品統計與預測");
        let mut forecasts = series_map
            .par_iter()
            .map(|(_, series)| self.forecast_product(series))
            .collect::<demand_core::Result<Vec<_>>>()?;

        forecasts.sort_by(|a, b| a.projection.product_id.cmp(&b.projection.product_id));

        let mut result = ForecastResult::empty();
        for forecast in forecasts {
            result.projections.push(forecast.projection);
            for warning in forecast.warnings {
                result.add_warning(warning);
            }
        }
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("需求預測完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "預測產品數量: {}，警告 {} 筆",
            result.projections.len(),
            result.warnings.len()
        );

        Ok(result)
    }

    /// 單一產品的統計與預測
    pub fn forecast_product(&self, series: &ProductSeries) -> demand_core::Result<ProductForecast> {
        tracing::debug!("計算產品預測: {}", series.product_id);

        let metrics = MetricsCalculator::compute(series, self.bucket_width)?;
        let projection = Forecaster::project(series, &metrics, &self.config, self.bucket_width);
        let warnings = self.collect_warnings(series, &projection);

        Ok(ProductForecast {
            projection,
            warnings,
        })
    }

    /// 檢查歷史資料是否足以支撐所選方法，並回報統計發現
    fn collect_warnings(
        &self,
        series: &ProductSeries,
        projection: &ProductProjection,
    ) -> Vec<ForecastWarning> {
        let product_id = &series.product_id;
        let metrics = &projection.metrics;
        let mut warnings = Vec::new();

        match self.config.method {
            ForecastMethod::SimpleMovingAverage | ForecastMethod::WeightedMovingAverage
                if series.len() < self.config.periods =>
            {
                warnings.push(ForecastWarning::warning(
                    product_id.clone(),
                    format!(
                        "歷史資料只有 {} 個時間桶，少於移動平均窗口 {}",
                        series.len(),
                        self.config.periods
                    ),
                ));
            }
            ForecastMethod::LinearRegression if series.len() < MIN_REGRESSION_PERIODS => {
                warnings.push(ForecastWarning::warning(
                    product_id.clone(),
                    format!(
                        "歷史資料只有 {} 個時間桶，線性迴歸信賴區間退化為點估計",
                        series.len()
                    ),
                ));
            }
            _ => {}
        }

        if metrics.has_outliers() {
            warnings.push(ForecastWarning::warning(
                product_id.clone(),
                format!("偵測到 {} 個異常時間桶", metrics.outliers.len()),
            ));
        }

        if metrics.has_seasonality() {
            warnings.push(ForecastWarning::info(
                product_id.clone(),
                format!("偵測到季節性（{} 個月資料）", series.len()),
            ));
        }

        warnings
    }

    /// 獲取預測配置引用
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// 獲取分桶寬度
    pub fn bucket_width(&self) -> BucketWidth {
        self.bucket_width
    }
}
