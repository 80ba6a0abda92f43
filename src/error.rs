//! 错误类型定义
//!
//! 区分“代码不存在”与上游请求/解析失败，对外只暴露固定的错误文案

use actix_web::http::StatusCode;
use thiserror::Error;

/// 对外返回的“代码不存在”文案
pub const SYMBOL_NOT_FOUND: &str = "Symbol not found";
/// 对外返回的通用失败文案
pub const FETCH_FAILED: &str = "Failed to fetch stock data";

#[derive(Debug, Error)]
pub enum StockError {
    /// 上游在响应体中标记代码不存在
    #[error("symbol not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid upstream endpoint: {0}")]
    Endpoint(String),
}

impl StockError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            StockError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给调用方的文案，不包含内部细节
    pub fn public_message(&self) -> &'static str {
        match self {
            StockError::NotFound(_) => SYMBOL_NOT_FOUND,
            _ => FETCH_FAILED,
        }
    }
}
