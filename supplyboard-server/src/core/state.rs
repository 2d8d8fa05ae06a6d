use std::sync::Arc;

use chrono_tz::Tz;
use supplyboard_client::{SnapshotSource, StaticSource};

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::services::SnapshotService;

/// 上游 API 快照源名称
pub const UPSTREAM_SOURCE: &str = "upstream";
/// 离线文件快照源名称
pub const FILE_SOURCE: &str = "file";

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | snapshots | SnapshotService | 上游数据快照缓存 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
///
/// # 使用示例
///
/// ```ignore
/// let snapshot = state.snapshots().current().await?;
/// let catalog = Catalog::new(&snapshot);
/// ```
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 快照缓存服务
    pub snapshots: SnapshotService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`]；测试用它注入内存快照源。
    pub fn new(config: Config, snapshots: SnapshotService, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            snapshots,
            jwt_service,
        }
    }

    /// 以指定快照源创建状态
    pub fn with_source(config: Config, name: &str, source: Arc<dyn SnapshotSource>) -> Self {
        let snapshots = SnapshotService::new(name, source, config.snapshot_ttl());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self::new(config, snapshots, jwt_service)
    }

    /// 初始化服务器状态
    ///
    /// 设置了 `SNAPSHOT_FILE` 时使用离线文件，否则连接上游 API。
    pub async fn initialize(config: &Config) -> Result<Self> {
        let state = match &config.snapshot_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "Using offline snapshot file");
                Self::with_source(config.clone(), FILE_SOURCE, Arc::new(StaticSource::from_file(path)))
            }
            None => {
                let client = config.client_config().build_http_client()?;
                tracing::info!(upstream = %client.base_url(), "Using upstream commerce API");
                Self::with_source(config.clone(), UPSTREAM_SOURCE, Arc::new(client))
            }
        };
        Ok(state)
    }

    /// 预热快照缓存
    ///
    /// 失败不阻止启动，首个请求会重试。
    pub async fn warm_up(&self) {
        if let Err(e) = self.snapshots.refresh().await {
            tracing::warn!(error = %e, "Snapshot warm-up failed, will retry on first request");
        }
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// 获取快照服务
    pub fn snapshots(&self) -> &SnapshotService {
        &self.snapshots
    }

    /// 业务时区
    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }
}
