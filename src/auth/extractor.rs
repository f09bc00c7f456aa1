//! 请求认证提取器

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use super::jwt;
use crate::error::AppError;
use crate::state::AppState;

/// 已认证用户（从 Bearer 令牌解出）
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let claims = jwt::decode_token(&state.config.jwt_secret, token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Self {
            id: claims.sub,
            email: claims.email,
        })
    }
}
