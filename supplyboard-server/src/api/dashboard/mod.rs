//! Dashboard API 模块
//!
//! | 路径 | 角色 |
//! |------|------|
//! | /api/dashboard/overview | superadmin |
//! | /api/dashboard/suppliers | superadmin |
//! | /api/dashboard/suppliers/{supplier_id} | superadmin |
//! | /api/dashboard/me | supplier |

mod handler;

use axum::{Router, middleware, routing::get};
use shared::session::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub use handler::{OverviewResponse, SupplierDashboard, SupplierEntry};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    let admin_routes = Router::new()
        .route("/overview", get(handler::overview))
        .route("/suppliers", get(handler::list_suppliers))
        .route("/suppliers/{supplier_id}", get(handler::supplier))
        .layer(middleware::from_fn(require_role(Role::Superadmin)));

    let supplier_routes = Router::new()
        .route("/me", get(handler::me))
        .layer(middleware::from_fn(require_role(Role::Supplier)));

    admin_routes.merge(supplier_routes)
}
