//! SupplyBoard Server - 供应商 / 超级管理员分析看板
//!
//! # 架构概述
//!
//! 从上游商务 API 拉取订单、商品、客户等数据快照，按
//! filter -> bucket -> reduce -> shape 管线计算图表数据：
//!
//! - **分析管线** (`analytics`): 过滤、分桶、聚合
//! - **图表** (`charts`): 各图表的参数与输出形状
//! - **认证** (`auth`): JWT 会话与角色路由
//! - **快照** (`services/snapshot`): TTL 缓存与票据
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! supplyboard-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── auth/          # JWT 会话、角色守卫
//! ├── analytics/     # 聚合管线
//! ├── charts/        # 图表
//! ├── services/      # 快照缓存、路由装配
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod charts;
pub mod core;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentSession, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::{SnapshotService, build_app, build_router};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境：加载 `.env`，初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____                   __      ____                       __
  / ___/__  ______  ____  / /_  __/ __ )____  ____ __________/ /
  \__ \/ / / / __ \/ __ \/ / / / / __  / __ \/ __ `/ ___/ __  /
 ___/ / /_/ / /_/ / /_/ / / /_/ / /_/ / /_/ / /_/ / /  / /_/ /
/____/\__,_/ .___/ .___/_/\__, /_____/\____/\__,_/_/   \__,_/
          /_/   /_/      /____/
    "#
    );
}
