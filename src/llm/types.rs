//! LLM 类型定义

use serde::{Deserialize, Serialize};

use crate::models::TaskPriority;

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色：system, user
    pub role: String,
    /// 消息内容
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 聊天选项
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// 温度参数
    pub temperature: Option<f64>,
    /// 最大 token 数
    pub max_tokens: Option<u32>,
}

/// 模型输出解码后的原始建议数据
///
/// 所有字段可缺省，由调用方做形状校验与填默认值。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSuggestion {
    #[serde(default)]
    pub subtasks: Option<Vec<String>>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub time_estimate: Option<u32>,
    #[serde(default)]
    pub tips: Option<Vec<String>>,
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// 未配置 API 密钥
    #[error("API key not configured")]
    MissingCredential,

    /// HTTP 请求错误
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API 返回非 2xx 状态（body 为响应体前 100 字符）
    #[error("{status} - {body}")]
    ApiStatus { status: u16, body: String },

    /// 模型返回空内容
    #[error("empty response")]
    EmptyResponse,

    /// 响应中找不到可解析的 JSON
    #[error("malformed response: {0}")]
    Malformed(String),

    /// JSON 可解析但形状不完整
    #[error("invalid response structure: {0}")]
    InvalidShape(String),

    /// 所有候选模型均失败（聚合每个模型的失败原因）
    #[error("all models failed: {0}")]
    AllModelsFailed(String),
}
