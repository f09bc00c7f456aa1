//! AI 请求日志记录器
//!
//! 把每次出站模型调用记录到 JSONL 文件，便于区分「所有模型都挂了」
//! 和「响应格式不对」这类回退链路问题。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::llm::LlmError;

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 请求 ID
    pub request_id: String,
    /// 时间戳
    pub timestamp: DateTime<Utc>,
    /// 模型名称
    pub model: String,
    /// 端点 URL
    pub endpoint: String,
    /// 状态：success / error
    pub status: String,
    /// 持续时间（毫秒）
    pub duration_ms: u64,
    /// 响应长度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// HTTP 状态码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    file: Mutex<Option<File>>,
}

impl RequestLogger {
    /// 创建新的日志记录器
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        let log_dir = log_dir.unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storage")
        });

        // 确保目录存在
        let _ = fs::create_dir_all(&log_dir);

        Self {
            log_path: log_dir.join("ai_requests.jsonl"),
            file: Mutex::new(None),
        }
    }

    /// 生成请求 ID
    fn generate_request_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }

    /// 记录成功的模型调用
    pub fn log_success(&self, model: &str, endpoint: &str, duration: Duration, response_length: usize) {
        self.write_entry(&LogEntry {
            request_id: Self::generate_request_id(),
            timestamp: Utc::now(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            status: "success".to_string(),
            duration_ms: duration.as_millis() as u64,
            response_length: Some(response_length),
            error_message: None,
            status_code: None,
        });
    }

    /// 记录失败的模型调用
    pub fn log_error(&self, model: &str, endpoint: &str, duration: Duration, error: &LlmError) {
        let status_code = match error {
            LlmError::ApiStatus { status, .. } => Some(*status),
            _ => None,
        };

        self.write_entry(&LogEntry {
            request_id: Self::generate_request_id(),
            timestamp: Utc::now(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            status: "error".to_string(),
            duration_ms: duration.as_millis() as u64,
            response_length: None,
            error_message: Some(error.to_string()),
            status_code,
        });
    }

    /// 写入日志条目
    fn write_entry(&self, entry: &LogEntry) {
        let mut file_guard = self.file.lock();

        // 懒打开文件
        if file_guard.is_none() {
            if let Ok(f) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                *file_guard = Some(f);
            }
        }

        if let Some(file) = file_guard.as_mut() {
            if let Ok(json) = serde_json::to_string(entry) {
                let _ = writeln!(file, "{}", json);
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_appended_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RequestLogger::new(Some(dir.path().to_path_buf()));

        logger.log_success("model-a", "http://x/v1/chat/completions", Duration::from_millis(12), 42);
        logger.log_error(
            "model-b",
            "http://x/v1/chat/completions",
            Duration::from_millis(5),
            &LlmError::EmptyResponse,
        );

        let contents = fs::read_to_string(dir.path().join("ai_requests.jsonl")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: LogEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.status, "success");
        assert_eq!(first.response_length, Some(42));

        let second: LogEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.status, "error");
        assert_eq!(second.error_message.as_deref(), Some("empty response"));
    }
}
