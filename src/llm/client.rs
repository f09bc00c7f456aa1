//! OpenRouter 聊天客户端
//!
//! 针对 OpenAI Chat Completions 格式的单次（非流式）请求封装。
//! 超时只依赖传输层默认值（整体 120 秒 / 连接 30 秒），编排层不再加钟。

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::types::{ChatMessage, ChatOptions, LlmError};

/// 错误响应体摘录的最大长度（字符）
const ERROR_BODY_EXCERPT: usize = 100;

/// 请求载荷
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// 响应载荷
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();

    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 Chat Completions 端点
pub(crate) fn build_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/chat/completions") {
        url
    } else if url.ends_with("/v1") {
        format!("{}/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

/// OpenRouter 客户端
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    /// 创建新的客户端；空密钥立即报告凭证缺失
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            client,
            api_key,
            endpoint: build_endpoint(&base_url.into()),
        })
    }

    /// 请求端点 URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 发送一次聊天请求，返回首个 choice 的文本内容
    ///
    /// 每个候选模型只发一次请求，不做重试。
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let payload = ChatCompletionRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!("LLM request: endpoint={}, model={}", self.endpoint, model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
            return Err(LlmError::ApiStatus {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        let decoded: ChatCompletionResponse = response.json().await?;

        let content = decoded
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(
            fix_base_url("https://openrouter.ai/api/"),
            "https://openrouter.ai/api"
        );
        assert_eq!(
            fix_base_url("https://openrouter.ai//api"),
            "https://openrouter.ai/api"
        );
    }

    #[test]
    fn test_build_endpoint() {
        assert_eq!(
            build_endpoint("https://openrouter.ai/api"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_endpoint("https://openrouter.ai/api/v1"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_endpoint("https://openrouter.ai/api/v1/chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            LlmClient::new("", "https://openrouter.ai/api"),
            Err(LlmError::MissingCredential)
        ));
    }
}
