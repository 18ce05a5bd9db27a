//! Student-t 臨界值查表
//!
//! 以自由度斷點 {5, 10, 20, 30, 50, 100, ∞} × 信賴水準 {0.90, 0.95, 0.99} 的
//! 雙尾臨界值做近似。自由度取第一個 >= df 的斷點，超過 100 時使用 ∞ 列。

/// 表格欄位對應的信賴水準
pub const CONFIDENCE_LEVELS: [f64; 3] = [0.90, 0.95, 0.99];

/// (自由度斷點, [0.90, 0.95, 0.99] 臨界值)
pub const T_TABLE: [(u32, [f64; 3]); 6] = [
    (5, [2.015, 2.571, 4.032]),
    (10, [1.812, 2.228, 3.169]),
    (20, [1.725, 2.086, 2.845]),
    (30, [1.697, 2.042, 2.750]),
    (50, [1.676, 2.009, 2.678]),
    (100, [1.660, 1.984, 2.626]),
];

/// 自由度無限大（常態分佈）的臨界值
pub const T_INFINITY: [f64; 3] = [1.645, 1.960, 2.576];

/// 選擇信賴水準欄位：取不超過要求水準的最高欄位，低於 0.90 時使用 0.90 欄
fn level_column(confidence_level: f64) -> usize {
    CONFIDENCE_LEVELS
        .iter()
        .rposition(|&level| confidence_level >= level - 1e-9)
        .unwrap_or(0)
}

/// 查詢 t 臨界值
pub fn t_critical(confidence_level: f64, degrees_of_freedom: u32) -> f64 {
    let column = level_column(confidence_level);

    T_TABLE
        .iter()
        .find(|(breakpoint, _)| *breakpoint >= degrees_of_freedom)
        .map(|(_, row)| row[column])
        .unwrap_or(T_INFINITY[column])
}
