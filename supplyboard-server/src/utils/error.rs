//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，这里只补充 handler 层的便捷函数。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Supplier 12"))
//!
//! // 返回成功响应
//! ok(payload)
//! ```

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// 包装成功响应
pub fn ok<T: Serialize>(data: T) -> super::ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
