//! Shared types for SupplyBoard
//!
//! Common types used across the board server and the upstream client:
//! error types, response structures, commerce models and the session.

pub mod error;
pub mod models;
pub mod session;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
pub use session::{Role, SIGN_IN_ROUTE, Session};
