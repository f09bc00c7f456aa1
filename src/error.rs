//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 字段校验错误（携带违反约束的字段名）
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// 请求参数错误
    #[error("{0}")]
    BadRequest(String),

    /// 未认证或令牌无效
    #[error("{0}")]
    Unauthorized(String),

    /// 资源未找到
    #[error("{0}")]
    NotFound(String),

    /// 数据库错误
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 内部错误
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Database(e) => {
                // 数据库细节不下发给客户端
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = match &self {
            AppError::Validation { field, .. } => Json(json!({
                "success": false,
                "error": error_message,
                "field": field
            })),
            _ => Json(json!({
                "success": false,
                "error": error_message
            })),
        };

        (status, body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
