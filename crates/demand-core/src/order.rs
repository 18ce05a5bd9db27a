//! 歷史訂單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 歷史訂單記錄（已由上游驗證）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// 訂單記錄ID
    pub id: Uuid,

    /// 訂單日期
    pub date: NaiveDate,

    /// 產品ID
    pub product_id: String,

    /// 產品名稱
    pub product_name: String,

    /// 訂購數量（非負）
    pub quantity: Decimal,

    /// 產品類別
    pub category: Option<String>,

    /// 單價
    pub unit_price: Option<Decimal>,

    /// 供應商
    pub supplier: Option<String>,
}

impl OrderRecord {
    /// 創建新的訂單記錄
    pub fn new(
        date: NaiveDate,
        product_id: String,
        product_name: String,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            product_id,
            product_name,
            quantity,
            category: None,
            unit_price: None,
            supplier: None,
        }
    }

    /// 建構器模式：設置類別
    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    /// 建構器模式：設置單價
    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier: String) -> Self {
        self.supplier = Some(supplier);
        self
    }

    /// 訂單金額（數量 × 單價），未提供單價時為 None
    pub fn line_amount(&self) -> Option<Decimal> {
        self.unit_price.map(|price| price * self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order() {
        let order = OrderRecord::new(
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            "SKU-001".to_string(),
            "Bike Helmet".to_string(),
            Decimal::from(12),
        );

        assert_eq!(order.product_id, "SKU-001");
        assert_eq!(order.quantity, Decimal::from(12));
        assert!(order.category.is_none());
        assert!(order.line_amount().is_none());
    }

    #[test]
    fn test_order_builder() {
        let order = OrderRecord::new(
            NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
            "SKU-002".to_string(),
            "Chain Lube".to_string(),
            Decimal::from(3),
        )
        .with_category("Maintenance".to_string())
        .with_unit_price(Decimal::new(1250, 2))
        .with_supplier("VENDOR-01".to_string());

        assert_eq!(order.category, Some("Maintenance".to_string()));
        assert_eq!(order.supplier, Some("VENDOR-01".to_string()));
        assert_eq!(order.line_amount(), Some(Decimal::new(3750, 2)));
    }
}
