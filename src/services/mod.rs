//! 业务逻辑服务模块
//!
//! 封装上游数据获取与归一化逻辑

pub mod normalize;     // 行情归一化
pub mod stock_service; // 股票数据服务
pub mod yahoo;         // Yahoo Finance 接口

pub use yahoo::{QuoteSource, YahooClient};
