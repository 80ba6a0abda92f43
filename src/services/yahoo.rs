//! Yahoo Finance 行情接口
//!
//! 对接 chart（实时行情）与 quoteSummary（公司概要）两个接口

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::StockError;
use crate::models::{ChartResponse, SummaryResponse};

/// quoteSummary 需要的模块
pub const SUMMARY_MODULES: &str = "price,summaryDetail,assetProfile";

/// 行情数据源
///
/// 两个接口互不依赖，可以并发调用
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 获取 chart 行情，代码不存在时上游在响应体中返回 `chart.error`
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResponse, StockError>;

    /// 获取公司概要，尽力而为：上游返回错误时得到空结果
    async fn fetch_summary(&self, symbol: &str) -> Result<SummaryResponse, StockError>;
}

/// Yahoo Finance 客户端
pub struct YahooClient {
    /// HTTP 客户端
    client: Client,
    chart_url: Url,
    summary_url: Url,
}

impl YahooClient {
    /// 根据配置创建客户端
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .cookie_store(true)
            .gzip(true)
            .build()
            .context("创建 HTTP 客户端失败")?;

        Ok(Self {
            client,
            chart_url: parse_base(&config.chart_url)?,
            summary_url: parse_base(&config.summary_url)?,
        })
    }

    /// 在基础地址后追加代码作为路径段（自动转义）
    fn endpoint(base: &Url, symbol: &str) -> Result<Url, StockError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| StockError::Endpoint(base.to_string()))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }
}

fn parse_base(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("无效的上游地址: {}", raw))?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("上游地址不能作为基础路径: {}", raw));
    }
    Ok(url)
}

#[async_trait]
impl QuoteSource for YahooClient {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResponse, StockError> {
        let url = Self::endpoint(&self.chart_url, symbol)?;

        let response = self
            .client
            .get(url)
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await?;

        // 代码不存在时状态码为 404，但响应体仍是带 error 的 JSON
        log::debug!("chart {} 响应状态: {}", symbol, response.status());

        let chart = response.json::<ChartResponse>().await?;
        Ok(chart)
    }

    async fn fetch_summary(&self, symbol: &str) -> Result<SummaryResponse, StockError> {
        let url = Self::endpoint(&self.summary_url, symbol)?;

        let response = self
            .client
            .get(url)
            .query(&[("modules", SUMMARY_MODULES)])
            .send()
            .await?;

        let status = response.status();
        log::debug!("quoteSummary {} 响应状态: {}", symbol, status);

        if !status.is_success() {
            log::warn!("quoteSummary {} 请求失败 ({})，忽略公司概要", symbol, status);
            return Ok(SummaryResponse::default());
        }

        let body = response.json::<serde_json::Value>().await?;
        match serde_json::from_value::<SummaryResponse>(body) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                log::warn!("quoteSummary {} 数据结构无法识别，忽略公司概要: {}", symbol, e);
                Ok(SummaryResponse::default())
            }
        }
    }
}
