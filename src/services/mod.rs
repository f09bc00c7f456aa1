//! 服务层模块

mod chat_service;
mod prompt_service;
mod suggestion_service;

pub use chat_service::{ChatService, DEMO_MODE_MESSAGE, UNAVAILABLE_MESSAGE};
pub use prompt_service::PromptService;
pub use suggestion_service::{fallback_suggestions, SuggestionService};

/// 候选模型列表（偏好顺序，靠前的优先尝试）
///
/// 任务建议与聊天共用同一份列表，避免两份副本各自漂移。
pub const MODEL_CANDIDATES: [&str; 5] = [
    "google/gemini-2.0-flash-001:free",
    "google/gemini-flash-1.5-8b:free",
    "meta-llama/llama-3.2-3b-instruct:free",
    "mistralai/mistral-7b-instruct:free",
    "nousresearch/hermes-3-llama-3.1-405b:free",
];

/// 统一采样温度
pub(crate) const TEMPERATURE: f64 = 0.7;
