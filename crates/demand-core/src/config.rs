//! 預測配置模型

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{Timeframe, MAX_TIMEFRAME_MONTHS, MAX_TIMEFRAME_WEEKS};
use crate::{ForecastError, Result};

/// 移動平均窗口的允許範圍
pub const MIN_PERIODS: usize = 2;
pub const MAX_PERIODS: usize = 12;

/// 提前期上限（天）
pub const MAX_LEAD_TIME_DAYS: u32 = 90;

/// 信賴水準的允許範圍
pub const MIN_CONFIDENCE_LEVEL: f64 = 0.80;
pub const MAX_CONFIDENCE_LEVEL: f64 = 0.99;

/// 預測方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// 簡單移動平均（SMA）
    #[serde(rename = "sma")]
    SimpleMovingAverage,
    /// 加權移動平均（WMA）- 越近期權重越高
    #[serde(rename = "wma")]
    WeightedMovingAverage,
    /// 線性迴歸 - 延伸歷史趨勢
    LinearRegression,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForecastMethod::SimpleMovingAverage => "sma",
            ForecastMethod::WeightedMovingAverage => "wma",
            ForecastMethod::LinearRegression => "linear_regression",
        };
        f.write_str(name)
    }
}

/// 需求預測參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 預測方法
    pub method: ForecastMethod,

    /// 預測時界（如 "4 weeks"、"2 months"）
    ///
    /// 無法辨識的字串會在換算時退回 4 個時間桶。
    #[serde(default = "default_timeframe")]
    pub timeframe: String,

    /// 移動平均窗口大小（2-12）
    #[serde(default = "default_periods")]
    pub periods: usize,

    /// 安全庫存百分比（0-100）
    #[serde(default = "default_safety_stock_percent")]
    pub safety_stock_percent: f64,

    /// 補貨提前期（天，0-90）
    #[serde(default = "default_lead_time_days")]
    pub lead_time_days: u32,

    /// 信賴水準（0.80-0.99）
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

fn default_timeframe() -> String {
    "4 weeks".to_string()
}

fn default_periods() -> usize {
    3
}

fn default_safety_stock_percent() -> f64 {
    20.0
}

fn default_lead_time_days() -> u32 {
    7
}

fn default_confidence_level() -> f64 {
    0.95
}

impl ForecastConfig {
    /// 創建新的預測配置
    pub fn new(method: ForecastMethod) -> Self {
        Self {
            method,
            timeframe: default_timeframe(),
            periods: default_periods(),
            safety_stock_percent: default_safety_stock_percent(),
            lead_time_days: default_lead_time_days(),
            confidence_level: default_confidence_level(),
        }
    }

    /// 從 JSON 載入配置並驗證
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ForecastError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置預測時界
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    /// 建構器模式：設置移動平均窗口（超出範圍時夾到 2-12）
    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods.clamp(MIN_PERIODS, MAX_PERIODS);
        self
    }

    /// 建構器模式：設置安全庫存百分比（夾到 0-100）
    pub fn with_safety_stock_percent(mut self, percent: f64) -> Self {
        self.safety_stock_percent = percent.clamp(0.0, 100.0);
        self
    }

    /// 建構器模式：設置補貨提前期（上限 90 天）
    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days.min(MAX_LEAD_TIME_DAYS);
        self
    }

    /// 建構器模式：設置信賴水準（夾到 0.80-0.99）
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level.clamp(MIN_CONFIDENCE_LEVEL, MAX_CONFIDENCE_LEVEL);
        self
    }

    /// 檢查所有參數是否在允許範圍內
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PERIODS..=MAX_PERIODS).contains(&self.periods) {
            return Err(ForecastError::InvalidConfig(format!(
                "periods 必須介於 {} 與 {} 之間，實際為 {}",
                MIN_PERIODS, MAX_PERIODS, self.periods
            )));
        }

        if !(0.0..=100.0).contains(&self.safety_stock_percent) {
            return Err(ForecastError::InvalidConfig(format!(
                "safety_stock_percent 必須介於 0 與 100 之間，實際為 {}",
                self.safety_stock_percent
            )));
        }

        if self.lead_time_days > MAX_LEAD_TIME_DAYS {
            return Err(ForecastError::InvalidConfig(format!(
                "lead_time_days 不可超過 {}，實際為 {}",
                MAX_LEAD_TIME_DAYS, self.lead_time_days
            )));
        }

        if !(MIN_CONFIDENCE_LEVEL..=MAX_CONFIDENCE_LEVEL).contains(&self.confidence_level) {
            return Err(ForecastError::InvalidConfig(format!(
                "confidence_level 必須介於 {} 與 {} 之間，實際為 {}",
                MIN_CONFIDENCE_LEVEL, MAX_CONFIDENCE_LEVEL, self.confidence_level
            )));
        }

        // 無法辨識的時界會退回預設桶數；可辨識但過長的時界直接拒絕
        if let Some(timeframe) = Timeframe::parse(&self.timeframe) {
            if !timeframe.is_within_limit() {
                return Err(ForecastError::InvalidConfig(format!(
                    "timeframe 不可超過 {} 週或 {} 個月，實際為 {}",
                    MAX_TIMEFRAME_WEEKS, MAX_TIMEFRAME_MONTHS, self.timeframe
                )));
            }
        }

        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new(ForecastMethod::SimpleMovingAverage)
    }
}
