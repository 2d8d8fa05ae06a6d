//! Unified Result Types
//!
//! Provides type aliases for commonly used Result types across the application

use axum::Json;
use shared::error::{ApiResponse, AppResult};

/// Result of a handler returning the `ApiResponse` envelope
pub type ApiResult<T> = AppResult<Json<ApiResponse<T>>>;
