//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 简单健康检查 | 无 |
//! | /health/detailed | GET | 详细健康检查 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "snapshot_loaded": true
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// 简单健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 是否已有数据快照
    snapshot_loaded: bool,
}

/// 详细健康检查响应
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 业务时区
    timezone: String,
    /// 各组件检查结果
    checks: HealthChecks,
}

/// 健康检查详情
#[derive(Serialize)]
pub struct HealthChecks {
    /// 数据快照检查
    snapshot: CheckResult,
}

/// 单项检查结果
#[derive(Serialize)]
pub struct CheckResult {
    /// 状态 (ok | stale | error)
    status: &'static str,
    /// 快照年龄 (秒)
    #[serde(skip_serializing_if = "Option::is_none")]
    age_seconds: Option<u64>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok(age_seconds: u64) -> Self {
        Self {
            status: "ok",
            age_seconds: Some(age_seconds),
            message: None,
        }
    }

    fn stale(age_seconds: u64) -> Self {
        Self {
            status: "stale",
            age_seconds: Some(age_seconds),
            message: Some("Snapshot older than its TTL".to_string()),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            age_seconds: None,
            message: Some(message.into()),
        }
    }
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

/// 记录启动时间 (服务器启动时调用)
pub fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 基础健康检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        snapshot_loaded: state.snapshots().cached().is_some(),
    })
}

/// 包含组件状态的详细健康检查
///
/// 不触发上游拉取，只报告缓存状态。
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let snapshot_check = match state.snapshots().status() {
        Ok(status) if status.stale => CheckResult::stale(status.age_secs),
        Ok(status) => CheckResult::ok(status.age_secs),
        Err(e) => CheckResult::error(e.message),
    };

    let all_ok = snapshot_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        timezone: state.timezone().name().to_string(),
        checks: HealthChecks {
            snapshot: snapshot_check,
        },
    })
}
