//! Session Extractor
//!
//! Handlers take a [`Session`] argument; it is read from the request
//! extensions set by `require_auth`, or validated from the header when the
//! route is not behind the middleware.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::session::Session;

use crate::auth::middleware::session_from_header;
use crate::core::ServerState;
use crate::utils::AppError;

/// 会话提取器 (newtype，孤儿规则要求)
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequestParts<ServerState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(Self(session.clone()));
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let session = session_from_header(state.get_jwt_service(), header, &parts.uri.to_string())?;

        // Store in extensions for potential reuse
        parts.extensions.insert(session.clone());
        Ok(Self(session))
    }
}

impl std::ops::Deref for CurrentSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.0
    }
}
