//! 股票数据模型
//!
//! 定义返回给前端的股票数据结构

use serde::{Deserialize, Serialize};

/// 统计数据不可用时的占位值
pub const NOT_AVAILABLE: &str = "N/A";

/// 展示值：数字原样输出，预格式化字符串或占位值输出为字符串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Text(String),
}

impl DisplayValue {
    /// `"N/A"` 占位值
    pub fn not_available() -> Self {
        DisplayValue::Text(NOT_AVAILABLE.to_string())
    }
}

impl From<Option<f64>> for DisplayValue {
    fn from(value: Option<f64>) -> Self {
        value.map(DisplayValue::Number).unwrap_or_else(DisplayValue::not_available)
    }
}

/// 股票信息
///
/// 每次请求由 chart 与 quoteSummary 两份数据归一化得到，
/// 所有字段都有确定的兜底值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    /// 股票代码
    pub symbol: String,
    /// 简称
    pub short_name: String,
    /// 全称
    pub long_name: String,
    /// 市场（交易所全称优先）
    pub market: String,
    /// 交易所代码
    pub exchange_name: String,
    /// 交易所全称
    pub full_exchange_name: String,
    /// 币种
    pub currency: String,
    /// 当前价格
    pub current_price: DisplayValue,
    /// 昨收
    pub previous_close: DisplayValue,
    /// 开盘价
    pub open: DisplayValue,
    /// 最高价
    pub day_high: DisplayValue,
    /// 最低价
    pub day_low: DisplayValue,
    /// 成交量
    pub volume: u64,
    /// 市值
    pub market_cap: DisplayValue,
    /// 52 周最高
    pub fifty_two_week_high: DisplayValue,
    /// 52 周最低
    pub fifty_two_week_low: DisplayValue,
    /// 市盈率（TTM）
    pub pe_ratio: DisplayValue,
    /// 股息率，如 "0.81%"
    pub dividend_yield: String,
    /// 行业板块
    pub sector: String,
    /// 细分行业
    pub industry: String,
    /// 公司网站
    pub website: String,
    /// 公司简介
    pub description: String,
    /// 涨跌额，两位小数
    pub change: String,
    /// 涨跌幅（百分比），两位小数
    pub change_percent: String,
}

/// 首页推荐股票卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedStock {
    pub symbol: String,
    /// 名称，行情加载前与代码相同
    pub name: String,
    pub logo_url: String,
}

impl FeaturedStock {
    pub fn new(symbol: &str, logo_template: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            logo_url: logo_template.replace("{symbol}", symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value_serializes_untagged() {
        assert_eq!(serde_json::to_value(DisplayValue::Number(150.5)).unwrap(), json!(150.5));
        assert_eq!(serde_json::to_value(DisplayValue::not_available()).unwrap(), json!("N/A"));
        assert_eq!(DisplayValue::from(None), DisplayValue::not_available());
        assert_eq!(DisplayValue::from(Some(1.0)), DisplayValue::Number(1.0));
    }

    #[test]
    fn test_featured_stock_logo_url() {
        let card = FeaturedStock::new("IAG.L", "https://img.logokit.com/ticker/{symbol}");
        assert_eq!(card.name, "IAG.L");
        assert_eq!(card.logo_url, "https://img.logokit.com/ticker/IAG.L");

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["logoUrl"], "https://img.logokit.com/ticker/IAG.L");
    }
}
