//! AI 聊天服务
//!
//! 与任务建议走同一条候选回退链路，但内容按纯文本返回，不做 JSON 提取。

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::llm::{ChatOptions, LlmClient, LlmError};
use crate::utils::RequestLogger;

use super::prompt_service::PromptService;
use super::{MODEL_CANDIDATES, TEMPERATURE};

/// 聊天请求的最大输出 token 数
const CHAT_MAX_TOKENS: u32 = 500;

/// 未配置 API 密钥时的提示语
pub const DEMO_MODE_MESSAGE: &str = "I'm currently in demo mode. To enable AI chat, please add OPENROUTER_API_KEY to your environment.";

/// 所有模型失败时的道歉语
pub const UNAVAILABLE_MESSAGE: &str =
    "I'm having trouble connecting to the AI service right now. Please try again in a moment.";

/// AI 聊天服务
pub struct ChatService {
    client: Option<LlmClient>,
    logger: Arc<RequestLogger>,
}

impl ChatService {
    /// 创建服务；API 密钥为空时不构造客户端
    pub fn new(config: &AppConfig, logger: Arc<RequestLogger>) -> Self {
        let client = LlmClient::new(
            config.openrouter_api_key.as_str(),
            config.openrouter_base_url.as_str(),
        )
        .ok();
        Self { client, logger }
    }

    /// 是否配置了 API 凭证
    pub fn available(&self) -> bool {
        self.client.is_some()
    }

    /// 生成聊天回复：顺序尝试候选模型，首个成功即返回
    pub async fn reply(&self, message: &str) -> Result<String, LlmError> {
        let client = self.client.as_ref().ok_or(LlmError::MissingCredential)?;

        let messages = PromptService::new().build_chat_messages(message);
        let options = ChatOptions {
            temperature: Some(TEMPERATURE),
            max_tokens: Some(CHAT_MAX_TOKENS),
        };

        let mut errors = Vec::new();
        for model in MODEL_CANDIDATES {
            let start = Instant::now();
            match client.chat(&messages, model, &options).await {
                Ok(content) => {
                    self.logger
                        .log_success(model, client.endpoint(), start.elapsed(), content.len());
                    info!("Chat reply generated: model={}", model);
                    return Ok(content);
                }
                Err(e) => {
                    self.logger
                        .log_error(model, client.endpoint(), start.elapsed(), &e);
                    warn!("Model {} failed: {}, trying next", model, e);
                    errors.push(format!("{}: {}", model, e));
                }
            }
        }

        Err(LlmError::AllModelsFailed(errors.join(" | ")))
    }
}
