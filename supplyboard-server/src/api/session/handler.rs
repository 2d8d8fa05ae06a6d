//! Session API Handlers

use serde::Serialize;
use shared::models::Supplier;
use shared::session::Session;

use crate::analytics::Catalog;
use crate::auth::CurrentSession;
use crate::core::ServerState;
use crate::utils::{ApiResult, ok};
use axum::extract::State;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
    /// 登录后跳转的页面
    pub home_route: String,
    /// 供应商资料 (供应商会话且快照中存在时)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
}

/// GET /api/session - 当前会话
///
/// 快照不可用时仍返回会话，只是缺少供应商资料。
pub async fn current(
    State(state): State<ServerState>,
    session: CurrentSession,
) -> ApiResult<SessionResponse> {
    let supplier = match session.supplier_scope() {
        Some(id) => match state.snapshots().current().await {
            Ok(snapshot) => Catalog::new(&snapshot).supplier(id).cloned(),
            Err(e) => {
                tracing::warn!(supplier = %id, error = %e, "Supplier profile unavailable");
                None
            }
        },
        None => None,
    };

    ok(SessionResponse {
        home_route: session.home_route(),
        session: session.0,
        supplier,
    })
}
