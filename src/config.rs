//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，并允许通过环境变量覆盖部分字段

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "STOCK_API_CONFIG";
/// 覆盖监听端口的环境变量
pub const PORT_ENV: &str = "PORT";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
    /// CORS 允许的来源
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
}

/// 上游行情接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// chart 行情接口地址（不含代码）
    #[serde(default = "default_chart_url")]
    pub chart_url: String,
    /// quoteSummary 公司概要接口地址（不含代码）
    #[serde(default = "default_summary_url")]
    pub summary_url: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 请求头 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 首页推荐股票配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedConfig {
    /// 推荐的股票代码列表
    #[serde(default = "default_featured_symbols")]
    pub symbols: Vec<String>,
    /// Logo 地址模板，`{symbol}` 会被替换为股票代码
    #[serde(default = "default_logo_url")]
    pub logo_url: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 上游接口配置
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 推荐股票配置
    #[serde(default)]
    pub featured: FeaturedConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3001 }
fn default_allow_origin() -> String { "*".to_string() }
fn default_chart_url() -> String { "https://query1.finance.yahoo.com/v8/finance/chart".to_string() }
fn default_summary_url() -> String { "https://query2.finance.yahoo.com/v10/finance/quoteSummary".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}
fn default_log_level() -> String { "info".to_string() }
fn default_featured_symbols() -> Vec<String> {
    ["FUN", "IAG.L", "2587.T", "COF"].iter().map(|s| s.to_string()).collect()
}
fn default_logo_url() -> String { "https://img.logokit.com/ticker/{symbol}".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            allow_origin: default_allow_origin(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            chart_url: default_chart_url(),
            summary_url: default_summary_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for FeaturedConfig {
    fn default() -> Self {
        Self {
            symbols: default_featured_symbols(),
            logo_url: default_logo_url(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 依次查找 `$STOCK_API_CONFIG`、`config.json`、`config/config.json`，
    /// 都不存在时使用默认值；文件存在但无法解析时返回错误。
    /// 加载发生在日志初始化之前，因此这里不打印日志。
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// 查找第一个存在的配置文件
    fn locate() -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from("config.json"));
        candidates.push(PathBuf::from("config/config.json"));

        candidates.into_iter().find(|path| path.exists())
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).and_then(|v| v.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
        assert_eq!(config.server.allow_origin, "*");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.upstream.connect_timeout_secs, 10);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.featured.symbols, vec!["FUN", "IAG.L", "2587.T", "COF"]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "server": { "port": 8080 }, "upstream": { "timeout_secs": 5 } }"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.upstream.chart_url, default_chart_url());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_port_env_override() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| (key == PORT_ENV).then(|| "9000".to_string()));
        assert_eq!(config.server.port, 9000);

        // 非法端口保持原值
        config.apply_env_overrides(|_| Some("not-a-port".to_string()));
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_from_file_reports_invalid_json() {
        let path = env::temp_dir().join(format!("stock-api-config-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();

        let result = AppConfig::from_file(&path);
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
