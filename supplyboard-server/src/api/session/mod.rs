//! Session API 模块
//!
//! 返回当前会话、登录后的首页路由，以及供应商的公司资料。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub use handler::SessionResponse;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/session", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::current))
}
