//! LLM 模块
//!
//! OpenRouter 单模型请求与自由文本响应解析。

mod client;
mod extract;
mod types;

pub use client::LlmClient;
pub use extract::extract_json;
pub use types::*;
