use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use supplyboard_client::ClientConfig;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};
use crate::utils::time::parse_timezone;

/// 默认业务时区
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Africa::Tunis;

/// 服务器配置 - 看板服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | UPSTREAM_URL | http://localhost:8000 | 上游商务 API 地址 |
/// | UPSTREAM_TOKEN | - | 上游 API Bearer 令牌 |
/// | UPSTREAM_TIMEOUT_SECS | 30 | 上游请求超时(秒) |
/// | SNAPSHOT_TTL_SECS | 300 | 快照缓存有效期(秒) |
/// | SNAPSHOT_REFRESH_SECS | 600 | 后台刷新间隔(秒)，0 表示关闭 |
/// | SNAPSHOT_FILE | - | 离线 JSON 快照 (替代上游 API) |
/// | BUSINESS_TIMEZONE | Africa/Tunis | 业务时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | ENVIRONMENT | development | 运行环境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时时间(毫秒) |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
///
/// # 示例
///
/// ```ignore
/// UPSTREAM_URL=https://shop.example HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 上游 API 基础地址
    pub upstream_url: String,
    /// 上游 API 令牌
    pub upstream_token: Option<String>,
    /// 上游请求超时 (秒)
    pub upstream_timeout_secs: u64,
    /// 快照缓存有效期 (秒)
    pub snapshot_ttl_secs: u64,
    /// 后台刷新间隔 (秒)，0 表示不启动刷新任务
    pub snapshot_refresh_secs: u64,
    /// 离线快照文件
    pub snapshot_file: Option<PathBuf>,
    /// 业务时区
    pub timezone: Tz,
    /// 日志级别
    pub log_level: String,
    /// JSON 日志
    pub log_json: bool,
    /// 日志目录
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。时区无法识别或 JWT 配置无效时返回错误。
    pub fn from_env() -> Result<Self> {
        let timezone = match env_opt("BUSINESS_TIMEZONE") {
            Some(name) => parse_timezone(&name)
                .ok_or_else(|| ServerError::Config(format!("Unknown BUSINESS_TIMEZONE: {}", name)))?,
            None => DEFAULT_TIMEZONE,
        };

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            upstream_url: env_opt("UPSTREAM_URL").unwrap_or_else(|| "http://localhost:8000".into()),
            upstream_token: env_opt("UPSTREAM_TOKEN"),
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            snapshot_ttl_secs: std::env::var("SNAPSHOT_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            snapshot_refresh_secs: std::env::var("SNAPSHOT_REFRESH_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(600),
            snapshot_file: env_opt("SNAPSHOT_FILE").map(PathBuf::from),
            timezone,
            log_level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: env_opt("LOG_DIR"),
            jwt: JwtConfig::from_env()?,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        })
    }

    /// 测试配置：离线快照、固定密钥、不启动后台刷新
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            http_port: 0,
            upstream_url: "http://localhost:8000".into(),
            upstream_token: None,
            upstream_timeout_secs: 5,
            snapshot_ttl_secs: 300,
            snapshot_refresh_secs: 0,
            snapshot_file: None,
            timezone: chrono_tz::UTC,
            log_level: "debug".into(),
            log_json: false,
            log_dir: None,
            jwt: JwtConfig::with_secret(jwt_secret),
            environment: "test".into(),
            shutdown_timeout_ms: 1000,
        }
    }

    /// 上游客户端配置
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.upstream_url.clone()).with_timeout(self.upstream_timeout_secs);
        match &self.upstream_token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_secs)
    }

    /// 后台刷新间隔 (未启用返回 None)
    pub fn snapshot_refresh_interval(&self) -> Option<Duration> {
        (self.snapshot_refresh_secs > 0).then(|| Duration::from_secs(self.snapshot_refresh_secs))
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_carries_token() {
        let mut config = Config::for_tests("config-test-secret-long-enough-1234");
        config.upstream_url = "https://shop.example".into();
        config.upstream_token = Some("abc".into());
        config.upstream_timeout_secs = 7;

        let client = config.client_config();
        assert_eq!(client.base_url, "https://shop.example");
        assert_eq!(client.token.as_deref(), Some("abc"));
        assert_eq!(client.timeout, 7);
    }

    #[test]
    fn test_refresh_interval_disabled_at_zero() {
        let mut config = Config::for_tests("config-test-secret-long-enough-1234");
        assert!(config.snapshot_refresh_interval().is_none());
        config.snapshot_refresh_secs = 60;
        assert_eq!(config.snapshot_refresh_interval(), Some(Duration::from_secs(60)));
        assert_eq!(config.snapshot_ttl(), Duration::from_secs(300));
    }
}
