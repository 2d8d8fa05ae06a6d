//! 服务器启动错误
//!
//! 请求处理使用 [`crate::utils::AppError`]；这里只覆盖启动和运行阶段。

use supplyboard_client::ClientError;
use thiserror::Error;

use crate::auth::JwtError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("JWT 配置错误: {0}")]
    Jwt(#[from] JwtError),

    #[error("上游客户端错误: {0}")]
    Client(#[from] ClientError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 启动流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
