//! Prompt 构建服务
//!
//! 负责构建任务建议与聊天两类消息列表。

use crate::llm::ChatMessage;

/// 任务建议系统提示词
const SUGGESTION_SYSTEM_PROMPT: &str = r#"You are a smart task management assistant. When given a task, provide:
1. 3-5 specific, actionable subtasks
2. Priority (low/medium/high)
3. Time estimate in minutes
4. 2-3 helpful tips

IMPORTANT: Respond with ONLY valid JSON in this exact format:
{
  "subtasks": ["step 1", "step 2", "step 3"],
  "priority": "medium",
  "timeEstimate": 60,
  "tips": ["tip 1", "tip 2"]
}"#;

/// 聊天系统提示词
const CHAT_SYSTEM_PROMPT: &str = r#"You are a helpful task management assistant.
Help users with:
- Task planning and organization
- Breaking down complex projects
- Productivity tips and advice
- Time management strategies
- Goal setting

Keep responses:
- Clear and concise (2-4 sentences)
- Actionable and practical
- Encouraging and positive
- Use bullet points when listing items"#;

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建任务建议消息列表
    pub fn build_suggestion_messages(&self, title: &str, description: &str) -> Vec<ChatMessage> {
        let description = if description.is_empty() {
            "None"
        } else {
            description
        };

        vec![
            ChatMessage::system(SUGGESTION_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Task: {}\nDescription: {}\n\nProvide JSON response only.",
                title, description
            )),
        ]
    }

    /// 构建聊天消息列表
    pub fn build_chat_messages(&self, message: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(CHAT_SYSTEM_PROMPT),
            ChatMessage::user(message),
        ]
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
