//! 補貨建議：安全庫存、再訂購點、建議訂購量

use demand_core::ForecastConfig;

/// 補貨建議（全部無條件進位為整數）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderPlan {
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub suggested_reorder_qty: f64,
}

impl ReorderPlan {
    /// 計算補貨建議
    ///
    /// - 安全庫存 = ceil(預測平均需求 × 安全庫存% / 100)
    /// - 再訂購點 = ceil(日平均需求 × 提前期 + 安全庫存)
    /// - 建議訂購量 = ceil(預測總需求 + 安全庫存)
    pub fn compute(
        avg_forecast_demand: f64,
        total_forecast_demand: f64,
        avg_daily_demand: f64,
        config: &ForecastConfig,
    ) -> Self {
        let safety_stock = (avg_forecast_demand * config.safety_stock_percent / 100.0).ceil();
        let reorder_point =
            (avg_daily_demand * config.lead_time_days as f64 + safety_stock).ceil();
        let suggested_reorder_qty = (total_forecast_demand + safety_stock).ceil();

        Self {
            safety_stock,
            reorder_point,
            suggested_reorder_qty,
        }
    }
}
