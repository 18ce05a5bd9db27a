//! 描述統計與最小平方迴歸

/// 平均值（空序列為 0）
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 樣本變異數（Bessel 校正，除以 n-1；n < 2 時為 0）
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// 樣本標準差
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// 母體變異數（除以 n）
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

/// 中位數（完整排序後取中間值，偶數個時取兩者平均）
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// 線性迴歸結果：y = intercept + slope * x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// 決定係數（已夾到 >= 0）
    pub r_squared: f64,
}

/// 以桶索引 0, 1, 2, … 為自變數做最小平方迴歸
///
/// 只有一個點時退化為 slope = 0、intercept = 該值、R² = 0。
pub fn linear_fit(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n == 0 {
        return LinearFit { slope: 0.0, intercept: 0.0, r_squared: 0.0 };
    }
    if n == 1 {
        return LinearFit { slope: 0.0, intercept: values[0], r_squared: 0.0 };
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let ss_tot: f64 = values.iter().map(|y| (y - y_mean).powi(2)).sum();
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (intercept + slope * i as f64)).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).max(0.0)
    };

    LinearFit { slope, intercept, r_squared }
}

/// 迴歸殘差標準誤 sqrt(SS_res / (n - 2))；n <= 2 時為 0
pub fn residual_std_error(values: &[f64], slope: f64, intercept: f64) -> f64 {
    let n = values.len();
    if n <= 2 {
        return 0.0;
    }
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (intercept + slope * i as f64)).powi(2))
        .sum();
    (ss_res / (n - 2) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

        assert!((mean(&values) - 5.0).abs() < EPS);
        assert!((population_variance(&values) - 4.0).abs() < EPS);
        assert!((sample_variance(&values) - 32.0 / 7.0).abs() < EPS);
    }

    #[test]
    fn test_variance_short_series() {
        assert_eq!(sample_variance(&[]), 0.0);
        assert_eq!(sample_variance(&[42.0]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_perfect_linear_fit() {
        let fit = linear_fit(&[10.0, 20.0, 30.0, 40.0]);

        assert!((fit.slope - 10.0).abs() < EPS);
        assert!((fit.intercept - 10.0).abs() < EPS);
        assert!((fit.r_squared - 1.0).abs() < EPS);
        assert!(residual_std_error(&[10.0, 20.0, 30.0, 40.0], fit.slope, fit.intercept) < EPS);
    }

    #[test]
    fn test_single_point_fit() {
        let fit = linear_fit(&[7.0]);

        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 7.0);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn test_constant_series_has_zero_r_squared() {
        let fit = linear_fit(&[5.0, 5.0, 5.0, 5.0]);

        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 5.0);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn test_residual_std_error() {
        // y = [1, 3, 2, 4]：slope 0.8，intercept 1.3
        let values = [1.0, 3.0, 2.0, 4.0];
        let fit = linear_fit(&values);
        assert!((fit.slope - 0.8).abs() < EPS);
        assert!((fit.intercept - 1.3).abs() < EPS);

        // 殘差 -0.3, 0.9, -0.9, 0.3 → SS_res = 1.8
        let se = residual_std_error(&values, fit.slope, fit.intercept);
        assert!((se - (1.8f64 / 2.0).sqrt()).abs() < EPS);
    }
}
