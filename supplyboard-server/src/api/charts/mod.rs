//! Charts API 模块
//!
//! `GET /api/charts/{chart}` 对供应商和超级管理员都开放，
//! 数据范围由会话决定 (见 [`DashboardQuery::scope`](crate::api::DashboardQuery::scope))。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/charts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{chart}", get(handler::render))
}
