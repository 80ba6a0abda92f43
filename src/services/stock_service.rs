//! 股票数据服务
//!
//! 并发请求 chart 与 quoteSummary，过滤不存在的代码后归一化

use crate::error::StockError;
use crate::models::StockInfo;

use super::normalize::normalize;
use super::yahoo::QuoteSource;

/// 获取单只股票信息
pub async fn get_stock_info(source: &dyn QuoteSource, symbol: &str) -> Result<StockInfo, StockError> {
    let (chart, summary) = tokio::join!(source.fetch_chart(symbol), source.fetch_summary(symbol));

    // chart 的结果优先判断：代码不存在时不再关心概要
    let quote = chart?.into_quote(symbol)?;
    log::debug!("{} 行情获取成功", symbol);

    let summary = summary?;
    if let Some(error) = summary.error() {
        log::warn!("{} 公司概要返回错误: {}", symbol, error);
    }
    let summary = summary.into_summary();
    if summary.is_none() {
        log::debug!("{} 无公司概要数据", symbol);
    }

    Ok(normalize(&quote, summary.as_ref()))
}
