//! Snapshot API 模块 (superadmin)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::session::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/snapshot", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::status))
        .route("/refresh", post(handler::refresh))
        .layer(middleware::from_fn(require_role(Role::Superadmin)))
}
