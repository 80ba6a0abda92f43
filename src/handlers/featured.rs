//! 首页推荐股票
//!
//! - GET /api/featured - 获取推荐股票卡片列表

use actix_web::{web, HttpResponse, Result};

use crate::config::FeaturedConfig;
use crate::models::FeaturedStock;

/// 获取推荐股票列表
///
/// 名称先用代码占位，前端加载行情后再替换
pub async fn list_featured(featured: web::Data<FeaturedConfig>) -> Result<HttpResponse> {
    let cards: Vec<FeaturedStock> = featured
        .symbols
        .iter()
        .map(|symbol| FeaturedStock::new(symbol, &featured.logo_url))
        .collect();

    Ok(HttpResponse::Ok().json(cards))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/featured", web::get().to(list_featured));
}
