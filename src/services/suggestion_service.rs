//! 任务建议服务
//!
//! 按固定偏好顺序逐个尝试候选模型，第一个成功立即返回，后面的模型
//! 不再调用；全部失败时把每个模型的失败原因聚合上抛，由请求边界
//! 降级为固定建议。候选之间严格串行，单次尝试只发一个请求。

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::llm::{extract_json, ChatOptions, LlmClient, LlmError, RawSuggestion};
use crate::models::{AiSuggestions, TaskPriority};
use crate::utils::RequestLogger;

use super::prompt_service::PromptService;
use super::{MODEL_CANDIDATES, TEMPERATURE};

/// 建议请求的最大输出 token 数
const SUGGESTION_MAX_TOKENS: u32 = 600;

/// 兜底建议（未配置密钥或所有模型失败时原样返回）
pub fn fallback_suggestions() -> AiSuggestions {
    AiSuggestions {
        subtasks: vec![
            "Research and gather requirements".to_string(),
            "Create a detailed action plan".to_string(),
            "Break down into smaller milestones".to_string(),
            "Execute step by step".to_string(),
            "Review and optimize the results".to_string(),
        ],
        priority: TaskPriority::Medium,
        time_estimate: 90,
        tips: vec![
            "Start with the most critical part first".to_string(),
            "Set specific deadlines for each subtask".to_string(),
            "Review progress regularly".to_string(),
        ],
        ai_model: "fallback".to_string(),
        success: false,
        error: None,
    }
}

/// 任务建议服务
pub struct SuggestionService {
    client: Option<LlmClient>,
    logger: Arc<RequestLogger>,
}

impl SuggestionService {
    /// 创建服务；API 密钥为空时不构造客户端，调用方直接走兜底
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

    /// 生成任务建议：顺序尝试候选模型，首个成功即返回
    pub async fn generate(
        &self,
        title: &str,
        description: &str,
    ) -> Result<AiSuggestions, LlmError> {
        let client = self.client.as_ref().ok_or(LlmError::MissingCredential)?;

        let mut errors = Vec::new();
        for model in MODEL_CANDIDATES {
            match self.try_model(client, model, title, description).await {
                Ok(result) => {
                    info!("Suggestion generated: model={}", model);
                    return Ok(result);
                }
                Err(e) => {
                    warn!("Model {} failed: {}, trying next", model, e);
                    errors.push(format!("{}: {}", model, e));
                }
            }
        }

        Err(LlmError::AllModelsFailed(errors.join(" | ")))
    }

    /// 尝试单个模型：一次请求，不重试
    async fn try_model(
        &self,
        client: &LlmClient,
        model: &str,
        title: &str,
        description: &str,
    ) -> Result<AiSuggestions, LlmError> {
        let messages = PromptService::new().build_suggestion_messages(title, description);
        let options = ChatOptions {
            temperature: Some(TEMPERATURE),
            max_tokens: Some(SUGGESTION_MAX_TOKENS),
        };

        let start = Instant::now();
        let content = match client.chat(&messages, model, &options).await {
            Ok(content) => {
                self.logger
                    .log_success(model, client.endpoint(), start.elapsed(), content.len());
                content
            }
            Err(e) => {
                self.logger
                    .log_error(model, client.endpoint(), start.elapsed(), &e);
                return Err(e);
            }
        };

        let value = extract_json(&content)?;
        let raw: RawSuggestion =
            serde_json::from_value(value).map_err(|e| LlmError::InvalidShape(e.to_string()))?;

        let subtasks = raw.subtasks.unwrap_or_default();
        if subtasks.is_empty() {
            return Err(LlmError::InvalidShape(
                "subtasks missing or empty".to_string(),
            ));
        }

        Ok(AiSuggestions {
            subtasks,
            priority: raw.priority.unwrap_or(TaskPriority::Medium),
            time_estimate: raw.time_estimate.unwrap_or(60),
            tips: raw.tips.unwrap_or_default(),
            ai_model: model.to_string(),
            success: true,
            error: None,
        })
    }
}
