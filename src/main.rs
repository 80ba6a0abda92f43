//! 股票行情查看后端服务
//!
//! 从 Yahoo Finance 获取行情与公司概要，归一化后提供给前端展示

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::CorsMiddleware;
use crate::services::{QuoteSource, YahooClient};

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:3001
#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:#}", e)))?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    let client = YahooClient::new(&config.upstream)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{:#}", e)))?;
    let source: Arc<dyn QuoteSource> = Arc::new(client);
    let source = web::Data::from(source);
    let featured = web::Data::new(config.featured.clone());
    let allow_origin = config.server.allow_origin.clone();

    let bind_addr = config.bind_addr();
    log::info!("启动股票行情服务，监听 {}", bind_addr);
    log::info!(
        "上游接口: {} / {}（超时 {}s）",
        config.upstream.chart_url,
        config.upstream.summary_url,
        config.upstream.timeout_secs
    );

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(CorsMiddleware::new(&allow_origin)) // 跨域
            .wrap(Logger::default()) // 添加请求日志中间件
            .app_data(source.clone())
            .app_data(featured.clone())
            .configure(handlers::config) // 配置路由
            .default_service(web::route().to(handlers::not_found))
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
