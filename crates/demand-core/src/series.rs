//! 分桶後的產品時間序列

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單一產品在單一時間桶內的彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPeriod {
    /// 時間桶起點
    pub period_start: NaiveDate,

    /// 顯示標籤
    pub period_label: String,

    /// 產品ID
    pub product_id: String,

    /// 產品名稱
    pub product_name: String,

    /// 桶內總數量（無訂單時為 0）
    pub total_quantity: Decimal,

    /// 桶內訂單數
    pub order_count: u32,

    /// 每筆訂單平均數量（訂單數為 0 時為 0）
    pub avg_quantity_per_order: Decimal,
}

impl AggregatedPeriod {
    /// 創建空的時間桶
    pub fn empty(
        period_start: NaiveDate,
        period_label: String,
        product_id: String,
        product_name: String,
    ) -> Self {
        Self {
            period_start,
            period_label,
            product_id,
            product_name,
            total_quantity: Decimal::ZERO,
            order_count: 0,
            avg_quantity_per_order: Decimal::ZERO,
        }
    }

    /// 累加一筆訂單
    pub fn add_order(&mut self, quantity: Decimal) {
        self.total_quantity += quantity;
        self.order_count += 1;
    }

    /// 計算每筆訂單平均數量（所有訂單累加完成後呼叫）
    pub fn finalize(&mut self) {
        self.avg_quantity_per_order = if self.order_count == 0 {
            Decimal::ZERO
        } else {
            self.total_quantity / Decimal::from(self.order_count)
        };
    }

    /// 檢查是否為零需求桶
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }
}

/// 單一產品的彙總結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeries {
    /// 產品ID
    pub product_id: String,

    /// 產品名稱
    pub product_name: String,

    /// 產品類別（第一個非空值）
    pub category: Option<String>,

    /// 連續且按時間遞增的時間桶
    pub data: Vec<AggregatedPeriod>,

    /// 訂單總數
    pub total_orders: u32,

    /// 數量總和
    pub total_quantity: Decimal,

    /// 第一筆訂單日期
    pub first_order_date: NaiveDate,

    /// 最後一筆訂單日期
    pub last_order_date: NaiveDate,
}

impl ProductSeries {
    /// 各時間桶數量（供統計計算使用）
    pub fn quantities(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|p| p.total_quantity.to_f64().unwrap_or(0.0))
            .collect()
    }

    /// 時間桶數量
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 最後一個時間桶起點
    pub fn last_period_start(&self) -> Option<NaiveDate> {
        self.data.last().map(|p| p.period_start)
    }
}
