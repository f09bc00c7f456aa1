//! Google OAuth 登录
//!
//! 标准授权码流程：前端跳转授权页 → 回调携 code → 换取 access_token →
//! 拉取 userinfo。令牌不落盘，换取后即弃，只保留用户身份。

use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AppError;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Google 返回的用户信息
#[derive(Debug, Deserialize)]
pub struct GoogleUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// 构建授权跳转 URL
pub fn build_auth_url(config: &AppConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline",
        AUTH_ENDPOINT,
        urlencoding::encode(&config.google_client_id),
        urlencoding::encode(&config.google_redirect_uri),
        urlencoding::encode("openid email profile"),
    )
}

/// 用授权码换取用户信息
pub async fn exchange_code(config: &AppConfig, code: &str) -> Result<GoogleUser, AppError> {
    let client = reqwest::Client::new();

    let token: TokenResponse = client
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("code", code),
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("redirect_uri", config.google_redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::BadRequest(format!("OAuth token exchange failed: {}", e)))?
        .error_for_status()
        .map_err(|e| AppError::BadRequest(format!("OAuth token exchange failed: {}", e)))?
        .json()
        .await
        .map_err(|e| AppError::BadRequest(format!("OAuth token response invalid: {}", e)))?;

    client
        .get(USERINFO_ENDPOINT)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(|e| AppError::BadRequest(format!("OAuth userinfo request failed: {}", e)))?
        .error_for_status()
        .map_err(|e| AppError::BadRequest(format!("OAuth userinfo request failed: {}", e)))?
        .json()
        .await
        .map_err(|e| AppError::BadRequest(format!("OAuth userinfo response invalid: {}", e)))
}
