//! 分桶日曆模型
//!
//! 負責將日期對齊到時間桶起點、產生連續的時間桶，以及把預測時界換算成桶數。

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 無法辨識時界字串時使用的預設桶數
pub const DEFAULT_HORIZON_BUCKETS: usize = 4;

/// 時界上限：104 週 / 24 個月（兩年），超過時視為無法使用
pub const MAX_TIMEFRAME_WEEKS: u32 = 104;
pub const MAX_TIMEFRAME_MONTHS: u32 = 24;

/// 各分桶寬度的換算常數：(每週桶數, 每月桶數)
///
/// 索引與 [`BucketWidth`] 的判別值一致（Daily = 0, Weekly = 1, Monthly = 2）。
const RATE_TABLE: [(f64, f64); 3] = [
    (7.0, 30.0),  // 每日
    (1.0, 4.33),  // 每週
    (0.25, 1.0),  // 每月
];

/// 時間分桶寬度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum BucketWidth {
    /// 每日分桶
    Daily = 0,
    /// 每週分桶（週一為起點）
    Weekly = 1,
    /// 每月分桶（每月一日為起點）
    Monthly = 2,
}

impl BucketWidth {
    /// 每週包含的桶數
    pub fn periods_per_week(self) -> f64 {
        RATE_TABLE[self as usize].0
    }

    /// 每月包含的桶數
    pub fn periods_per_month(self) -> f64 {
        RATE_TABLE[self as usize].1
    }

    /// 每個桶代表的天數（7 / 每週桶數）
    pub fn days_per_period(self) -> f64 {
        7.0 / self.periods_per_week()
    }

    /// 將日期對齊到所屬時間桶的起點
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            BucketWidth::Daily => date,
            BucketWidth::Weekly => {
                let offset = date.weekday().num_days_from_monday() as i64;
                date - chrono::Duration::days(offset)
            }
            BucketWidth::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    /// 下一個時間桶的起點（日期溢出時返回 None）
    pub fn next_period(self, period_start: NaiveDate) -> Option<NaiveDate> {
        match self {
            BucketWidth::Daily => period_start.succ_opt(),
            BucketWidth::Weekly => period_start.checked_add_signed(chrono::Duration::weeks(1)),
            BucketWidth::Monthly => period_start.checked_add_months(Months::new(1)),
        }
    }

    /// 時間桶的顯示標籤
    pub fn period_label(self, period_start: NaiveDate) -> String {
        match self {
            BucketWidth::Daily => period_start.format("%Y-%m-%d").to_string(),
            BucketWidth::Weekly => {
                let week = period_start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            BucketWidth::Monthly => period_start.format("%b %Y").to_string(),
        }
    }

    /// 產生從 `start` 到 `end`（含）所屬時間桶之間的所有桶起點
    pub fn buckets_between(self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let last = self.period_start(end);
        let mut buckets = Vec::new();
        let mut current = Some(self.period_start(start));

        while let Some(date) = current {
            if date > last {
                break;
            }
            buckets.push(date);
            current = self.next_period(date);
        }

        buckets
    }

    /// 從 `after` 之後連續產生 `count` 個時間桶起點
    pub fn following_periods(self, after: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut periods = Vec::new();
        let mut current = after;

        for _ in 0..count {
            match self.next_period(current) {
                Some(next) => {
                    periods.push(next);
                    current = next;
                }
                None => break,
            }
        }

        periods
    }

    /// 將時界字串換算成未來桶數
    ///
    /// 無法辨識、為 0 或超過兩年上限時返回預設值 4。
    pub fn horizon_buckets(self, timeframe: &str) -> usize {
        Timeframe::parse(timeframe)
            .filter(|t| t.is_within_limit())
            .map(|t| t.bucket_count(self))
            .filter(|&count| count > 0)
            .unwrap_or(DEFAULT_HORIZON_BUCKETS)
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BucketWidth::Daily => "daily",
            BucketWidth::Weekly => "weekly",
            BucketWidth::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// 預測時界（以週或月表示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Weeks(u32),
    Months(u32),
}

impl Timeframe {
    /// 解析時界字串
    ///
    /// 支援 `"4 weeks"`、`"1 week"`、`"2_months"`、`"3-month"`、`"6w"`、`"2m"` 等寫法。
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        let digits_end = normalized
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(normalized.len());

        let amount: u32 = normalized[..digits_end].parse().ok()?;
        let unit = normalized[digits_end..].trim_matches(|c: char| c == ' ' || c == '_' || c == '-');

        match unit {
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Timeframe::Weeks(amount)),
            "m" | "mo" | "mos" | "month" | "months" => Some(Timeframe::Months(amount)),
            _ => None,
        }
    }

    /// 是否在 [`MAX_TIMEFRAME_WEEKS`] / [`MAX_TIMEFRAME_MONTHS`] 範圍內
    pub fn is_within_limit(self) -> bool {
        match self {
            Timeframe::Weeks(weeks) => weeks <= MAX_TIMEFRAME_WEEKS,
            Timeframe::Months(months) => months <= MAX_TIMEFRAME_MONTHS,
        }
    }

    /// 換算成指定分桶寬度下的桶數（無條件進位）
    pub fn bucket_count(self, width: BucketWidth) -> usize {
        let buckets = match self {
            Timeframe::Weeks(weeks) => weeks as f64 * width.periods_per_week(),
            Timeframe::Months(months) => months as f64 * width.periods_per_month(),
        };
        buckets.ceil() as usize
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Weeks(1) => f.write_str("1 week"),
            Timeframe::Weeks(n) => write!(f, "{} weeks", n),
            Timeframe::Months(1) => f.write_str("1 month"),
            Timeframe::Months(n) => write!(f, "{} months", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(BucketWidth::Daily, 7.0, 30.0, 1.0)]
    #[case(BucketWidth::Weekly, 1.0, 4.33, 7.0)]
    #[case(BucketWidth::Monthly, 0.25, 1.0, 28.0)]
    fn test_rate_table(
        #[case] width: BucketWidth,
        #[case] per_week: f64,
        #[case] per_month: f64,
        #[case] days: f64,
    ) {
        assert_eq!(width.periods_per_week(), per_week);
        assert_eq!(width.periods_per_month(), per_month);
        assert_eq!(width.days_per_period(), days);
    }

    #[test]
    fn test_period_start() {
        // 2025-10-09 是週四
        let thursday = date(2025, 10, 9);

        assert_eq!(BucketWidth::Daily.period_start(thursday), thursday);
        assert_eq!(BucketWidth::Weekly.period_start(thursday), date(2025, 10, 6));
        assert_eq!(BucketWidth::Monthly.period_start(thursday), date(2025, 10, 1));

        // 週一本身就是週起點
        assert_eq!(BucketWidth::Weekly.period_start(date(2025, 10, 6)), date(2025, 10, 6));
    }

    #[test]
    fn test_monthly_buckets_cross_year() {
        let buckets = BucketWidth::Monthly.buckets_between(date(2024, 11, 20), date(2025, 2, 3));

        assert_eq!(
            buckets,
            vec![date(2024, 11, 1), date(2024, 12, 1), date(2025, 1, 1), date(2025, 2, 1)]
        );
    }

    #[test]
    fn test_weekly_buckets() {
        let buckets = BucketWidth::Weekly.buckets_between(date(2025, 10, 8), date(2025, 10, 20));

        assert_eq!(buckets, vec![date(2025, 10, 6), date(2025, 10, 13), date(2025, 10, 20)]);
    }

    #[test]
    fn test_single_bucket() {
        let day = date(2025, 3, 15);
        assert_eq!(BucketWidth::Daily.buckets_between(day, day), vec![day]);
    }

    #[test]
    fn test_following_periods() {
        let next = BucketWidth::Monthly.following_periods(date(2025, 11, 1), 3);
        assert_eq!(next, vec![date(2025, 12, 1), date(2026, 1, 1), date(2026, 2, 1)]);
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(BucketWidth::Daily.period_label(date(2025, 1, 5)), "2025-01-05");
        assert_eq!(BucketWidth::Weekly.period_label(date(2025, 1, 13)), "2025-W03");
        assert_eq!(BucketWidth::Monthly.period_label(date(2025, 1, 1)), "Jan 2025");
    }

    #[rstest]
    #[case("4 weeks", Some(Timeframe::Weeks(4)))]
    #[case("1 week", Some(Timeframe::Weeks(1)))]
    #[case("2 months", Some(Timeframe::Months(2)))]
    #[case("3_months", Some(Timeframe::Months(3)))]
    #[case(" 6W ", Some(Timeframe::Weeks(6)))]
    #[case("12m", Some(Timeframe::Months(12)))]
    #[case("next quarter", None)]
    #[case("weeks", None)]
    #[case("", None)]
    fn test_parse_timeframe(#[case] input: &str, #[case] expected: Option<Timeframe>) {
        assert_eq!(Timeframe::parse(input), expected);
    }

    #[rstest]
    #[case(BucketWidth::Daily, "4 weeks", 28)]
    #[case(BucketWidth::Daily, "2 months", 60)]
    #[case(BucketWidth::Weekly, "4 weeks", 4)]
    #[case(BucketWidth::Weekly, "2 months", 9)]
    #[case(BucketWidth::Weekly, "3 months", 13)]
    #[case(BucketWidth::Monthly, "4 weeks", 1)]
    #[case(BucketWidth::Monthly, "6 weeks", 2)]
    #[case(BucketWidth::Monthly, "6 months", 6)]
    fn test_horizon_buckets(#[case] width: BucketWidth, #[case] timeframe: &str, #[case] expected: usize) {
        assert_eq!(width.horizon_buckets(timeframe), expected);
    }

    #[test]
    fn test_unknown_timeframe_defaults_to_four() {
        assert_eq!(BucketWidth::Daily.horizon_buckets("fortnight"), DEFAULT_HORIZON_BUCKETS);
        assert_eq!(BucketWidth::Monthly.horizon_buckets("0 months"), DEFAULT_HORIZON_BUCKETS);
    }

    #[rstest]
    #[case(BucketWidth::Daily, "104 weeks", 728)]
    #[case(BucketWidth::Daily, "105 weeks", DEFAULT_HORIZON_BUCKETS)]
    #[case(BucketWidth::Weekly, "24 months", 104)]
    #[case(BucketWidth::Weekly, "25 months", DEFAULT_HORIZON_BUCKETS)]
    #[case(BucketWidth::Daily, "4000000000 weeks", DEFAULT_HORIZON_BUCKETS)]
    #[case(BucketWidth::Daily, "99999999999 weeks", DEFAULT_HORIZON_BUCKETS)]
    fn test_oversize_timeframe_falls_back(
        #[case] width: BucketWidth,
        #[case] timeframe: &str,
        #[case] expected: usize,
    ) {
        assert_eq!(width.horizon_buckets(timeframe), expected);
    }

    #[test]
    fn test_following_periods_stops_at_calendar_end() {
        let periods = BucketWidth::Daily.following_periods(NaiveDate::MAX.pred_opt().unwrap(), 5);
        assert_eq!(periods, vec![NaiveDate::MAX]);
    }

    #[test]
    fn test_timeframe_display() {
        assert_eq!(Timeframe::Weeks(1).to_string(), "1 week");
        assert_eq!(Timeframe::Months(3).to_string(), "3 months");
    }
}
