//! 增量預測
//!
//! 持有訂單集合並快取每個產品的預測結果。訂單變動只讓該產品失效；
//! 分桶寬度或配置變動則讓所有產品失效。

use demand_calc::engine::ProductForecast;
use demand_calc::{Aggregator, ForecastEngine, ForecastResult};
use demand_core::{BucketWidth, ForecastConfig, OrderRecord, ProductProjection, ProductSeries};
use std::collections::HashMap;
use uuid::Uuid;

use crate::dirty_tracking::DirtyTracker;

/// 增量預測計算器
#[derive(Debug, Clone)]
pub struct IncrementalForecaster {
    engine: ForecastEngine,

    /// 按產品分組的訂單
    orders: HashMap<String, Vec<OrderRecord>>,

    /// 每個產品最近一次的預測
    cache: HashMap<String, ProductForecast>,

    tracker: DirtyTracker,

    /// 最近一次 refresh 的耗時（毫秒）
    last_refresh_ms: Option<u128>,
}

impl IncrementalForecaster {
    /// 創建新的增量計算器
    pub fn new(config: ForecastConfig, bucket_width: BucketWidth) -> demand_core::Result<Self> {
        Ok(Self {
            engine: ForecastEngine::new(config, bucket_width)?,
            orders: HashMap::new(),
            cache: HashMap::new(),
            tracker: DirtyTracker::new(),
            last_refresh_ms: None,
        })
    }

    /// 添加訂單，對應產品標記為髒
    pub fn add_orders(&mut self, orders: impl IntoIterator<Item = OrderRecord>) {
        for order in orders {
            self.tracker.mark_dirty(&order.product_id);
            self.orders
                .entry(order.product_id.clone())
                .or_default()
                .push(order);
        }
    }

    /// 依訂單ID移除訂單，找不到時返回 false
    pub fn remove_order(&mut self, order_id: Uuid) -> bool {
        let found = self.orders.iter_mut().find_map(|(product_id, orders)| {
            orders
                .iter()
                .position(|o| o.id == order_id)
                .map(|index| (product_id.clone(), index))
        });

        match found {
            Some((product_id, index)) => {
                if let Some(orders) = self.orders.get_mut(&product_id) {
                    orders.remove(index);
                }
                self.tracker.mark_dirty(&product_id);
                true
            }
            None => false,
        }
    }

    /// 變更分桶寬度，所有產品失效
    pub fn set_bucket_width(&mut self, bucket_width: BucketWidth) -> demand_core::Result<()> {
        if bucket_width != self.engine.bucket_width() {
            self.engine = ForecastEngine::new(self.engine.config().clone(), bucket_width)?;
            self.invalidate_all();
        }
        Ok(())
    }

    /// 變更預測配置，所有產品失效
    pub fn set_config(&mut self, config: ForecastConfig) -> demand_core::Result<()> {
        if &config != self.engine.config() {
            self.engine = ForecastEngine::new(config, self.engine.bucket_width())?;
            self.invalidate_all();
        }
        Ok(())
    }

    /// 重新計算所有髒產品，返回本次重算的產品ID（排序後）
    ///
    /// 計算失敗時，尚未完成的產品（含失敗者）維持髒標記，下次 refresh 會再重算。
    pub fn refresh(&mut self) -> demand_core::Result<Vec<String>> {
        self.refresh_with(ForecastEngine::forecast_product)
    }

    fn refresh_with<F>(&mut self, compute: F) -> demand_core::Result<Vec<String>>
    where
        F: Fn(&ForecastEngine, &ProductSeries) -> demand_core::Result<ProductForecast>,
    {
        if !self.tracker.has_dirty() {
            return Ok(Vec::new());
        }

        let start_time = std::time::Instant::now();
        let dirty = self.tracker.take_dirty_products();

        tracing::debug!("增量重算產品數量: {}", dirty.len());

        for (index, product_id) in dirty.iter().enumerate() {
            let has_orders = self
                .orders
                .get(product_id)
                .is_some_and(|orders| !orders.is_empty());
            if !has_orders {
                self.orders.remove(product_id);
                self.cache.remove(product_id);
                continue;
            }
            let Some(orders) = self.orders.get(product_id) else {
                continue;
            };

            let series_map = Aggregator::aggregate(orders, self.engine.bucket_width());
            let Some(series) = series_map.get(product_id) else {
                continue;
            };

            match compute(&self.engine, series) {
                Ok(forecast) => {
                    self.cache.insert(product_id.clone(), forecast);
                }
                Err(err) => {
                    tracing::warn!("產品 {} 重算失敗: {}", product_id, err);
                    self.tracker.mark_all(&dirty[index..]);
                    return Err(err);
                }
            }
        }

        self.last_refresh_ms = Some(start_time.elapsed().as_millis());
        Ok(dirty)
    }

    /// 目前快取的完整結果（按產品ID排序）
    ///
    /// 未 refresh 的變動不會反映在結果中。
    pub fn result(&self) -> ForecastResult {
        let mut product_ids: Vec<&String> = self.cache.keys().collect();
        product_ids.sort();

        let mut result = ForecastResult::empty();
        for product_id in product_ids {
            if let Some(forecast) = self.cache.get(product_id) {
                result.projections.push(forecast.projection.clone());
                for warning in &forecast.warnings {
                    result.add_warning(warning.clone());
                }
            }
        }
        result.calculation_time_ms = self.last_refresh_ms;
        result
    }

    /// 查詢單一產品的快取預測
    pub fn projection(&self, product_id: &str) -> Option<&ProductProjection> {
        self.cache.get(product_id).map(|f| &f.projection)
    }

    /// 檢查產品是否待重算
    pub fn is_dirty(&self, product_id: &str) -> bool {
        self.tracker.is_dirty(product_id)
    }

    /// 目前持有的訂單數
    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }

    fn invalidate_all(&mut self) {
        self.tracker.mark_all(self.orders.keys());
    }
}
