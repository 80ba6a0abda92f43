//! 通用 API 响应模型

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 错误响应体：`{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// 响应时间戳（RFC 3339，UTC）
    pub timestamp: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
