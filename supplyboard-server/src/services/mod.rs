//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`SnapshotService`] - 上游数据快照缓存 (TTL + 票据防止旧响应覆盖)
//! - [`https`] - HTTP 路由装配

pub mod https;
pub mod snapshot;

pub use https::{build_app, build_router};
pub use snapshot::{SnapshotService, SnapshotStatus};
