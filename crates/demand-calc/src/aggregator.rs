//! 時間分桶彙總
//!
//! 將不規則的歷史訂單按產品分組，並在第一筆與最後一筆訂單之間補齊所有時間桶，
//! 讓後續的趨勢與季節性計算看到等距的序列。

use chrono::NaiveDate;
use demand_core::{AggregatedPeriod, BucketWidth, OrderRecord, ProductSeries};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 時間分桶彙總器
pub struct Aggregator;

impl Aggregator {
    /// 依產品彙總訂單
    ///
    /// 空的訂單列表返回空映射。
    pub fn aggregate(
        orders: &[OrderRecord],
        bucket_width: BucketWidth,
    ) -> HashMap<String, ProductSeries> {
        let grouped = Self::group_orders_by_product(orders);

        tracing::debug!(
            "彙總 {} 筆訂單，產品數量: {}，分桶: {}",
            orders.len(),
            grouped.len(),
            bucket_width
        );

        grouped
            .into_iter()
            .filter_map(|(product_id, product_orders)| {
                Self::build_series(&product_orders, bucket_width)
                    .map(|series| (product_id, series))
            })
            .collect()
    }

    /// 按產品分組訂單（保留輸入順序）
    fn group_orders_by_product(orders: &[OrderRecord]) -> HashMap<String, Vec<&OrderRecord>> {
        let mut grouped: HashMap<String, Vec<&OrderRecord>> = HashMap::new();
        for order in orders {
            grouped
                .entry(order.product_id.clone())
                .or_default()
                .push(order);
        }
        grouped
    }

    /// 建立單一產品的連續序列
    fn build_series(orders: &[&OrderRecord], bucket_width: BucketWidth) -> Option<ProductSeries> {
        let first = orders.first()?;
        let first_order_date = orders.iter().map(|o| o.date).min()?;
        let last_order_date = orders.iter().map(|o| o.date).max()?;

        let product_id = first.product_id.clone();
        let product_name = first.product_name.clone();
        let category = orders.iter().find_map(|o| o.category.clone());

        // 先產生所有時間桶（含零需求桶）
        let bucket_starts = bucket_width.buckets_between(first_order_date, last_order_date);
        let mut buckets: HashMap<NaiveDate, AggregatedPeriod> = bucket_starts
            .iter()
            .map(|&start| {
                (
                    start,
                    AggregatedPeriod::empty(
                        start,
                        bucket_width.period_label(start),
                        product_id.clone(),
                        product_name.clone(),
                    ),
                )
            })
            .collect();

        // 再把訂單累加進對應的桶
        let mut total_quantity = Decimal::ZERO;
        for order in orders {
            let start = bucket_width.period_start(order.date);
            if let Some(bucket) = buckets.get_mut(&start) {
                bucket.add_order(order.quantity);
            }
            total_quantity += order.quantity;
        }

        // 所有訂單累加完成後才計算平均值
        let mut data: Vec<AggregatedPeriod> = buckets.into_values().collect();
        for period in &mut data {
            period.finalize();
        }
        data.sort_by_key(|p| p.period_start);

        Some(ProductSeries {
            product_id,
            product_name,
            category,
            data,
            total_orders: orders.len() as u32,
            total_quantity,
            first_order_date,
            last_order_date,
        })
    }
}
