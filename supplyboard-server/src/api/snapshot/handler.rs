//! Snapshot API Handlers

use axum::extract::State;

use crate::auth::CurrentSession;
use crate::core::ServerState;
use crate::security_log;
use crate::services::SnapshotStatus;
use crate::utils::{ApiResult, ok};

/// GET /api/snapshot - 缓存状态
pub async fn status(State(state): State<ServerState>) -> ApiResult<SnapshotStatus> {
    ok(state.snapshots().status()?)
}

/// POST /api/snapshot/refresh - 立即从上游拉取
pub async fn refresh(
    State(state): State<ServerState>,
    session: CurrentSession,
) -> ApiResult<SnapshotStatus> {
    security_log!(
        "INFO",
        "snapshot_refresh",
        user_id = session.user_id.clone(),
        source = state.snapshots().source_name().to_string()
    );
    state.snapshots().refresh().await?;
    ok(state.snapshots().status()?)
}
