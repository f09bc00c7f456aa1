//! 认证端点
//!
//! 凭证注册/登录与 Google OAuth 登录，两条路径最终都落到同一份用户表
//! 并签发同样的 JWT 会话令牌。

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::{self, google, AuthUser};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use crate::state::AppState;

/// 口令最小长度
const MIN_PASSWORD_LENGTH: usize = 6;

/// 宽松的邮箱格式校验
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// 注册新用户
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation {
            field: "name",
            message: "Name is required".to_string(),
        });
    }

    let email = req.email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::Validation {
            field: "email",
            message: "Please enter a valid email".to_string(),
        });
    }

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation {
            field: "password",
            message: "Password must be at least 6 characters".to_string(),
        });
    }

    if state.db.users().find_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(&req.password);
    state
        .db
        .users()
        .create(Some(name), &email, Some(password_hash.as_str()), None)
        .await?;

    info!("User registered: email={}", email);

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// 凭证登录，签发会话令牌
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = req.email.trim().to_lowercase();

    let user = state
        .db
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("No user found with this email".to_string()))?;

    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("This account uses OAuth sign-in".to_string()))?;

    if !auth::verify_password(&req.password, password_hash) {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let token = auth::issue_token(&state.config.jwt_secret, &user.id, &user.email)
        .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))?;

    info!("User logged in: email={}", email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// 当前登录用户
async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let record = state
        .db
        .users()
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        user: record.into(),
    }))
}

/// OAuth 授权 URL 响应
#[derive(Debug, serde::Serialize)]
pub struct OAuthUrlResponse {
    pub url: String,
}

/// OAuth 回调查询参数
#[derive(Debug, Deserialize)]
struct OAuthCallbackQuery {
    code: String,
}

/// 获取 Google 授权跳转 URL
async fn google_auth_url(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<OAuthUrlResponse>> {
    if !state.config.oauth_configured() {
        return Err(AppError::BadRequest(
            "Google OAuth is not configured".to_string(),
        ));
    }

    Ok(Json(OAuthUrlResponse {
        url: google::build_auth_url(&state.config),
    }))
}

/// Google OAuth 回调：换码、取用户信息、落库并签发令牌
async fn google_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> AppResult<Json<AuthResponse>> {
    if !state.config.oauth_configured() {
        return Err(AppError::BadRequest(
            "Google OAuth is not configured".to_string(),
        ));
    }

    let google_user = google::exchange_code(&state.config, &query.code).await?;

    let user = state
        .db
        .users()
        .upsert_oauth(
            google_user.name.as_deref(),
            &google_user.email,
            google_user.picture.as_deref(),
        )
        .await?;

    let token = auth::issue_token(&state.config.jwt_secret, &user.id, &user.email)
        .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))?;

    info!("OAuth login: email={}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// 创建认证路由
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/oauth/google", get(google_auth_url))
        .route("/api/auth/oauth/google/callback", get(google_callback))
}
