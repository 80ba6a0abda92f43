//! 股票行情处理器
//!
//! - GET /api/stock/{symbol} - 获取单只股票信息

use actix_web::{web, HttpResponse, Result};

use crate::error::SYMBOL_NOT_FOUND;
use crate::models::ErrorResponse;
use crate::services::stock_service;
use crate::services::QuoteSource;

/// 代码最大长度
const MAX_SYMBOL_LEN: usize = 32;

/// 规范化路径中的代码：去空白、转大写，只允许字母数字和 `.-^=`
///
/// 支持 `IAG.L`、`2587.T`、`^GSPC`、`EURUSD=X` 这类带后缀的代码
pub fn sanitize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));

    valid.then_some(symbol)
}

/// 获取单只股票信息
///
/// GET /api/stock/{symbol}
pub async fn get_stock_info(
    path: web::Path<String>,
    source: web::Data<dyn QuoteSource>,
) -> Result<HttpResponse> {
    let raw = path.into_inner();

    let Some(symbol) = sanitize_symbol(&raw) else {
        log::warn!("非法股票代码: {:?}", raw);
        return Ok(HttpResponse::NotFound().json(ErrorResponse::new(SYMBOL_NOT_FOUND)));
    };

    match stock_service::get_stock_info(source.get_ref(), &symbol).await {
        Ok(stock_info) => Ok(HttpResponse::Ok().json(stock_info)),
        Err(e) => {
            if e.status_code().is_server_error() {
                log::error!("获取 {} 行情失败: {}", symbol, e);
            } else {
                log::warn!("{}", e);
            }
            let response = ErrorResponse::new(e.public_message());
            Ok(HttpResponse::build(e.status_code()).json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stock/{symbol}", web::get().to(get_stock_info));
}
