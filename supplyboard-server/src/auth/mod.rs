//! 认证授权模块
//!
//! 提供 JWT 会话校验和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentSession`] - 当前会话提取器
//! - [`require_auth`] - 认证中间件 (未登录跳转登录页)
//! - [`require_role`] - 角色检查中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::CurrentSession;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{SessionExt, require_auth, require_role, sign_in_required};
