//! AI 建议与聊天端点
//!
//! 请求边界：先做输入校验，再查凭证。AI 侧的任何失败都降级为
//! 兜底内容并以 200 返回，绝不向终端用户暴露硬错误；只有入站
//! 数据不合法才会得到 4xx。

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::{AiSuggestions, ChatRequest, ChatResponse, SuggestionRequest};
use crate::services::{fallback_suggestions, DEMO_MODE_MESSAGE, UNAVAILABLE_MESSAGE};
use crate::state::AppState;

/// 任务标题的最小长度（字符）
const MIN_TITLE_LENGTH: usize = 3;
/// 聊天消息的最大长度（字符）
const MAX_CHAT_MESSAGE_LENGTH: usize = 1000;

/// 生成任务建议
async fn ai_suggestions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestionRequest>,
) -> AppResult<Json<AiSuggestions>> {
    let title = req.title.trim();
    if title.chars().count() < MIN_TITLE_LENGTH {
        return Err(AppError::Validation {
            field: "title",
            message: "Task title must be at least 3 characters".to_string(),
        });
    }
    let description = req.description.as_deref().unwrap_or("").trim();

    if !state.suggestions.available() {
        warn!("OpenRouter API key missing, returning fallback suggestions");
        let mut fallback = fallback_suggestions();
        fallback.error = Some("OpenRouter API key not configured".to_string());
        return Ok(Json(fallback));
    }

    match state.suggestions.generate(title, description).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            warn!("Suggestion generation failed, using fallback: {}", e);
            let mut fallback = fallback_suggestions();
            fallback.error = Some(format!("AI temporarily unavailable: {}", e));
            Ok(Json(fallback))
        }
    }
}

/// AI 聊天
async fn ai_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation {
            field: "message",
            message: "Message is required".to_string(),
        });
    }
    if message.chars().count() > MAX_CHAT_MESSAGE_LENGTH {
        return Err(AppError::Validation {
            field: "message",
            message: "Message too long (max 1000 characters)".to_string(),
        });
    }

    if !state.chat.available() {
        return Ok(Json(ChatResponse {
            response: DEMO_MODE_MESSAGE.to_string(),
            success: false,
            error: None,
        }));
    }

    match state.chat.reply(message).await {
        Ok(response) => Ok(Json(ChatResponse {
            response,
            success: true,
            error: None,
        })),
        Err(e) => {
            warn!("Chat reply failed, using fallback message: {}", e);
            Ok(Json(ChatResponse {
                response: UNAVAILABLE_MESSAGE.to_string(),
                success: false,
                error: Some(e.to_string()),
            }))
        }
    }
}

/// 创建 AI 路由
pub fn ai_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ai/suggestions", post(ai_suggestions))
        .route("/api/ai/chat", post(ai_chat))
}
