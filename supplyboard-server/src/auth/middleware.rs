//! 认证中间件
//!
//! 会话守卫：校验 JWT，将 [`Session`] 注入请求扩展，并按角色放行。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::session::{Role, SIGN_IN_ROUTE, Session};

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 401 错误附带登录页跳转
pub fn sign_in_required(err: AppError) -> AppError {
    err.with_detail("redirect", SIGN_IN_ROUTE)
}

/// 从 Authorization 头解析会话
///
/// 失败时返回带 `details.redirect` 的 401 错误。
pub fn session_from_header(jwt_service: &JwtService, header: Option<&str>, uri: &str) -> Result<Session, AppError> {
    let token = match header {
        Some(header) => JwtService::extract_from_header(header).ok_or_else(|| {
            sign_in_required(AppError::invalid_token("Invalid authorization header"))
        })?,
        None => {
            security_log!("WARN", "auth_missing", uri = uri.to_string());
            return Err(sign_in_required(AppError::unauthorized()));
        }
    };

    let claims = jwt_service.validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = uri.to_string()
        );
        sign_in_required(match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        })
    })?;

    Session::try_from(claims).map_err(|e| {
        security_log!(
            "WARN",
            "session_malformed",
            error = format!("{}", e),
            uri = uri.to_string()
        );
        sign_in_required(AppError::with_message(
            ErrorCode::SessionMalformed,
            format!("Malformed session claims: {}", e),
        ))
    })
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`Session`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (含 `/health`)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | 未知角色 / 供应商缺少 ID | 401 SessionMalformed |
///
/// 所有 401 响应的 `details.redirect` 为登录页路由。
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let uri = req.uri().to_string();
    let session = session_from_header(state.get_jwt_service(), header, &uri)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// 角色检查中间件 - 要求特定角色
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/overview", get(handler::overview))
///     .layer(middleware::from_fn(require_role(Role::Superadmin)));
/// ```
///
/// # 错误
///
/// 角色不符返回 403 Forbidden
pub fn require_role(
    role: Role,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let session = req.session()?;

            if session.role != role {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = session.user_id.clone(),
                    username = session.username.clone(),
                    user_role = session.role.as_str(),
                    required_role = role.as_str()
                );
                let code = match role {
                    Role::Superadmin => ErrorCode::SuperadminRequired,
                    Role::Supplier => ErrorCode::RoleRequired,
                };
                return Err(AppError::new(code).with_detail("required_role", role.as_str()));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 从请求中提取 Session 的扩展方法
pub trait SessionExt {
    /// 从请求扩展中获取 Session
    ///
    /// # 错误
    ///
    /// 未认证返回 401 Unauthorized
    fn session(&self) -> Result<&Session, AppError>;
}

impl SessionExt for Request {
    fn session(&self) -> Result<&Session, AppError> {
        self.extensions()
            .get::<Session>()
            .ok_or_else(|| sign_in_required(AppError::unauthorized()))
    }
}
