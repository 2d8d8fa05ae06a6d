//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共)
//! - [`session`] - 当前会话与首页路由
//! - [`dashboard`] - 汇总卡片与供应商列表
//! - [`charts`] - 图表数据
//! - [`snapshot`] - 快照刷新
//! - [`query`] - 共用查询参数

pub mod charts;
pub mod dashboard;
pub mod health;
pub mod query;
pub mod session;
pub mod snapshot;

use crate::analytics::Catalog;
use crate::charts::ChartContext;
use crate::core::ServerState;
use crate::utils::AppResult;

// Re-export common types for handlers
pub use crate::utils::ApiResult;
pub use query::DashboardQuery;

/// 在当前快照上执行计算
///
/// 快照按需刷新；计算本身是同步的，只借用快照。
pub(crate) async fn with_snapshot<T>(
    state: &ServerState,
    compute: impl FnOnce(&ChartContext<'_, '_>) -> AppResult<T>,
) -> AppResult<T> {
    let snapshot = state.snapshots().current().await?;
    let catalog = Catalog::new(&snapshot);
    let ctx = ChartContext::new(&catalog, state.timezone());
    compute(&ctx)
}
