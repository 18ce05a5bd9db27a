//! 簡單需求預測示例

use chrono::{Duration, NaiveDate};
use demand::{BucketWidth, ForecastConfig, ForecastEngine, ForecastMethod, OrderRecord};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 簡單需求預測示例 ===\n");

    // 十二週的訂單：安全帽穩定成長，手套在第 8 週有大單
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).ok_or_else(|| anyhow::anyhow!("無效日期"))?;
    let mut orders = Vec::new();
    for week in 0..12 {
        let monday = start + Duration::weeks(week);
        orders.push(
            OrderRecord::new(
                monday,
                "BIKE-HELMET".to_string(),
                "Bike Helmet".to_string(),
                Decimal::from(20 + week * 3),
            )
            .with_category("Safety".to_string())
            .with_unit_price(Decimal::new(4999, 2)),
        );
        let gloves = if week == 8 { 120 } else { 15 };
        orders.push(
            OrderRecord::new(
                monday + Duration::days(2),
                "GLOVES".to_string(),
                "Riding Gloves".to_string(),
                Decimal::from(gloves),
            )
            .with_category("Apparel".to_string())
            .with_unit_price(Decimal::new(1850, 2)),
        );
    }

    let revenue: Decimal = orders.iter().filter_map(OrderRecord::line_amount).sum();
    println!("歷史訂單 {} 筆，營業額 {}\n", orders.len(), revenue);

    let config = ForecastConfig::new(ForecastMethod::LinearRegression)
        .with_timeframe("1 month")
        .with_safety_stock_percent(15.0)
        .with_lead_time_days(10);
    let engine = ForecastEngine::new(config, BucketWidth::Weekly)?;

    let result = engine.run(&orders)?;

    for projection in &result.projections {
        println!(
            "產品: {} ({}) 趨勢: {:?}, 變異係數: {:.2}",
            projection.product_name,
            projection.product_id,
            projection.metrics.trend,
            projection.metrics.coefficient_of_variation
        );
        println!("  {:<10} {:>10} {:>10} {:>10}", "期間", "需求", "下限", "上限");
        for point in projection.points() {
            let marker = if point.is_forecast { "*" } else { " " };
            println!(
                "{} {:<10} {:>10} {:>10} {:>10}",
                marker, point.period_label, point.demand, point.confidence_low, point.confidence_high
            );
        }
        println!(
            "  預測總需求: {}, 安全庫存: {}, 再訂購點: {}, 建議訂購量: {}\n",
            projection.total_projected_demand,
            projection.safety_stock,
            projection.reorder_point,
            projection.suggested_reorder_qty
        );
    }

    for warning in &result.warnings {
        println!("[{:?}] {}: {}", warning.severity, warning.product_id, warning.message);
    }

    Ok(())
}
