//! Yahoo Finance 上游数据模型
//!
//! 只声明需要用到的字段，其余字段在反序列化时忽略

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::StockError;

// ==================== chart 接口 ====================

/// chart 接口响应
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<RawQuote>>,
    /// 代码不存在时上游在这里返回错误对象
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ChartResponse {
    /// 取出第一条行情结果
    ///
    /// 带错误标记、没有结果或者代码为空都视为代码不存在
    pub fn into_quote(self, symbol: &str) -> Result<RawQuote, StockError> {
        if self.chart.error.is_some() {
            return Err(StockError::NotFound(symbol.to_string()));
        }

        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .filter(|quote| !quote.meta.symbol.is_empty())
            .ok_or_else(|| StockError::NotFound(symbol.to_string()))
    }
}

/// chart 接口中的单条行情
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuote {
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: Indicators,
}

/// 行情元数据
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// 缺失时为空串，由 `into_quote` 视为代码不存在
    #[serde(default)]
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange_name: Option<String>,
    pub full_exchange_name: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_volume: Option<u64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

/// 分时序列，停牌时可能夹杂 null
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

// ==================== quoteSummary 接口 ====================

/// quoteSummary 接口响应
#[derive(Debug, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(rename = "quoteSummary", default)]
    pub quote_summary: Option<SummaryBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryBody {
    #[serde(default)]
    pub result: Option<Vec<RawSummary>>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl SummaryResponse {
    /// 取出第一条概要结果，没有时返回 None
    pub fn into_summary(self) -> Option<RawSummary> {
        self.quote_summary?.result?.into_iter().next()
    }

    /// 上游返回的错误对象（仅用于日志）
    pub fn error(&self) -> Option<&serde_json::Value> {
        self.quote_summary.as_ref()?.error.as_ref()
    }
}

/// quoteSummary 中的三个模块，均可缺失
///
/// 各模块单独解析，某个模块结构异常时只丢弃该模块
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSummary {
    #[serde(default, deserialize_with = "lenient_module")]
    pub price: Option<PriceModule>,
    #[serde(default, deserialize_with = "lenient_module")]
    pub summary_detail: Option<SummaryDetail>,
    #[serde(default, deserialize_with = "lenient_module")]
    pub asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    pub market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    pub fifty_two_week_high: Option<RawValue>,
    pub fifty_two_week_low: Option<RawValue>,
    pub dividend_yield: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
}

/// 上游数值字段的三种形态：裸数字、字符串、`{raw, fmt}` 结构
///
/// 结构体里类型不符的 `raw`/`fmt`（如 `"raw": "Infinity"`）按缺失处理，
/// 其余无法识别的值落入 `Other`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Structured {
        #[serde(default, deserialize_with = "lenient_number")]
        raw: Option<f64>,
        #[serde(default, deserialize_with = "lenient_text")]
        fmt: Option<String>,
    },
    Other(serde_json::Value),
}

impl RawValue {
    /// 原始数值
    pub fn raw(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Structured { raw, .. } => *raw,
            RawValue::Text(_) | RawValue::Other(_) => None,
        }
    }

    /// 预格式化字符串
    pub fn fmt(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Structured { fmt, .. } => fmt.as_deref(),
            RawValue::Number(_) | RawValue::Other(_) => None,
        }
    }
}

fn lenient_module<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match serde_json::from_value(value) {
        Ok(module) => Ok(Some(module)),
        Err(e) => {
            log::debug!("quoteSummary 模块结构无法识别，已忽略: {}", e);
            Ok(None)
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}
