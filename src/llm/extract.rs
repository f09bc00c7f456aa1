//! 模型响应解析
//!
//! 模型经常把 JSON 包在 Markdown 代码块里，或在前后追加说明文字。
//! 截取规则是「第一个 `{` 到最后一个 `}`」的贪婪匹配，刻意容忍
//! JSON 之后的附加评论；调用方依赖这一语义，替换实现时必须保持。

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::LlmError;

/// 代码块围栏标记（含可选语言标签）
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[a-zA-Z]*\n?").unwrap());

/// 第一个 `{` 到最后一个 `}` 的贪婪匹配
static JSON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// 从自由文本中提取并解析 JSON 对象
pub fn extract_json(text: &str) -> Result<serde_json::Value, LlmError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let cleaned = if trimmed.contains("```") {
        FENCE_RE.replace_all(trimmed, "").into_owned()
    } else {
        trimmed.to_string()
    };

    let candidate = JSON_RE
        .find(&cleaned)
        .ok_or_else(|| LlmError::Malformed("no JSON object in response".to_string()))?;

    serde_json::from_str(candidate.as_str().trim()).map_err(|e| LlmError::Malformed(e.to_string()))
}
