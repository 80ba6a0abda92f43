//! 行情归一化
//!
//! 把 chart 与 quoteSummary 两份上游数据合并成一条 `StockInfo`。
//! 每个字段按固定顺序依次取值，第一个存在的值生效，最后落到占位值。
//! 纯函数，不做 IO，也不打印日志。

use crate::models::{
    AssetProfile, DisplayValue, PriceModule, QuoteIndicator, RawQuote, RawSummary, RawValue,
    StockInfo, SummaryDetail, NOT_AVAILABLE,
};

/// 归一化一条行情
///
/// `summary` 缺失时三个模块都按空对象处理
pub fn normalize(quote: &RawQuote, summary: Option<&RawSummary>) -> StockInfo {
    let meta = &quote.meta;
    let series = quote.indicators.quote.first();

    let price: Option<&PriceModule> = summary.and_then(|s| s.price.as_ref());
    let detail: Option<&SummaryDetail> = summary.and_then(|s| s.summary_detail.as_ref());
    let profile: Option<&AssetProfile> = summary.and_then(|s| s.asset_profile.as_ref());

    // 名称
    let short_name = meta
        .short_name
        .clone()
        .or_else(|| price.and_then(|p| p.short_name.clone()))
        .unwrap_or_else(|| meta.symbol.clone());
    let long_name = meta
        .long_name
        .clone()
        .or_else(|| price.and_then(|p| p.long_name.clone()))
        .unwrap_or_else(|| short_name.clone());

    // 交易所
    let full_exchange_name = meta
        .full_exchange_name
        .clone()
        .or_else(|| meta.exchange_name.clone())
        .unwrap_or_default();

    // 价格
    let current_price = meta.regular_market_price;
    let previous_close = meta.previous_close.or(meta.chart_previous_close);
    let open = first_of(series, |s| &s.open).or(current_price);
    let day_high = meta
        .regular_market_day_high
        .or_else(|| first_of(series, |s| &s.high))
        .or(current_price);
    let day_low = meta
        .regular_market_day_low
        .or_else(|| first_of(series, |s| &s.low))
        .or(current_price);
    let volume = meta
        .regular_market_volume
        .or_else(|| first_of(series, |s| &s.volume))
        .unwrap_or(0);

    // 统计数据
    let market_cap = resolve(price.and_then(|p| p.market_cap.as_ref()))
        .or_else(|| resolve(detail.and_then(|d| d.market_cap.as_ref())))
        .unwrap_or_else(DisplayValue::not_available);
    let pe_ratio = resolve(detail.and_then(|d| d.trailing_pe.as_ref()))
        .unwrap_or_else(DisplayValue::not_available);
    let fifty_two_week_high = meta
        .fifty_two_week_high
        .map(|v| DisplayValue::Text(fixed2(v)))
        .or_else(|| resolve(detail.and_then(|d| d.fifty_two_week_high.as_ref())))
        .unwrap_or_else(DisplayValue::not_available);
    let fifty_two_week_low = meta
        .fifty_two_week_low
        .map(|v| DisplayValue::Text(fixed2(v)))
        .or_else(|| resolve(detail.and_then(|d| d.fifty_two_week_low.as_ref())))
        .unwrap_or_else(DisplayValue::not_available);
    let dividend_yield = dividend_yield(detail.and_then(|d| d.dividend_yield.as_ref()));

    // 公司资料
    let sector = profile
        .and_then(|p| p.sector.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let industry = profile
        .and_then(|p| p.industry.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let website = profile.and_then(|p| p.website.clone()).unwrap_or_default();
    let description = profile
        .and_then(|p| p.long_business_summary.clone())
        .unwrap_or_default();

    let (change, change_percent) = price_change(current_price, previous_close);

    StockInfo {
        symbol: meta.symbol.clone(),
        short_name,
        long_name,
        market: full_exchange_name.clone(),
        exchange_name: meta.exchange_name.clone().unwrap_or_default(),
        full_exchange_name,
        currency: meta.currency.clone().unwrap_or_default(),
        current_price: current_price.into(),
        previous_close: previous_close.into(),
        open: open.into(),
        day_high: day_high.into(),
        day_low: day_low.into(),
        volume,
        market_cap,
        fifty_two_week_high,
        fifty_two_week_low,
        pe_ratio,
        dividend_yield,
        sector,
        industry,
        website,
        description,
        change,
        change_percent,
    }
}

/// 把三种上游形态统一成展示值
///
/// 结构体优先取 `fmt`，其次取 `raw`；两者都没有时视为未提供
pub fn resolve(value: Option<&RawValue>) -> Option<DisplayValue> {
    match value? {
        RawValue::Number(n) => Some(DisplayValue::Number(*n)),
        RawValue::Text(s) => Some(DisplayValue::Text(s.clone())),
        RawValue::Structured { fmt: Some(fmt), .. } => Some(DisplayValue::Text(fmt.clone())),
        RawValue::Structured { raw: Some(raw), .. } => Some(DisplayValue::Number(*raw)),
        RawValue::Structured { .. } | RawValue::Other(_) => None,
    }
}

/// 股息率：带百分号的预格式化字符串原样使用，否则由小数换算
fn dividend_yield(value: Option<&RawValue>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    match (value.fmt(), value.raw()) {
        (Some(fmt), _) if fmt.contains('%') => fmt.to_string(),
        (_, Some(raw)) => format!("{}%", fixed2(raw * 100.0)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// 涨跌额与涨跌幅
///
/// 涨跌幅基于未取整的涨跌额计算。价格缺失或结果非有限数时输出 `"N/A"`。
fn price_change(current: Option<f64>, previous: Option<f64>) -> (String, String) {
    match (current, previous) {
        (Some(current), Some(previous)) => {
            let change = current - previous;
            (finite_fixed2(change), finite_fixed2(change / previous * 100.0))
        }
        _ => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    }
}

fn first_of<T: Copy>(
    series: Option<&QuoteIndicator>,
    field: impl Fn(&QuoteIndicator) -> &Vec<Option<T>>,
) -> Option<T> {
    series.and_then(|s| field(s).first().copied().flatten())
}

fn finite_fixed2(value: f64) -> String {
    if value.is_finite() {
        fixed2(value)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// 保留两位小数，精确的零不输出负号
///
/// 恰好落在两档中间的值（如 0.125）远离零取整，与浏览器端 `toFixed(2)` 一致
pub fn fixed2(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };

    // 只有 n/8（n 为奇数）形式的值在第三位小数上是精确的 5
    let eighths = value.abs() * 8.0;
    if eighths < 1e15 && eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let cents = (value.abs() * 100.0).ceil() as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, cents / 100, cents % 100);
    }

    format!("{:.2}", value)
}
