//! 应用配置管理
//!
//! 从环境变量加载配置，进程启动时构造一次，由组合根显式传递。

use std::path::PathBuf;

/// 应用配置结构体
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// SQLite 连接串
    pub database_url: String,
    /// OpenRouter API 密钥（空串表示未配置）
    pub openrouter_api_key: String,
    /// OpenRouter API 基础 URL
    pub openrouter_base_url: String,
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// Google OAuth 客户端 ID
    pub google_client_id: String,
    /// Google OAuth 客户端密钥
    pub google_client_secret: String,
    /// Google OAuth 回调地址
    pub google_redirect_uri: String,
    /// AI 请求日志目录（缺省记录到可执行文件旁的 storage/）
    pub ai_request_log_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://taskhub.db".to_string()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api".to_string()
}

fn default_jwt_secret() -> String {
    "taskhub-dev-secret".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            openrouter_api_key: String::new(),
            openrouter_base_url: default_base_url(),
            jwt_secret: default_jwt_secret(),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            google_redirect_uri: String::new(),
            ai_request_log_dir: None,
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置，缺省值同 Default
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env_or("DATABASE_URL", defaults.database_url),
            openrouter_api_key: env_or("OPENROUTER_API_KEY", String::new()),
            openrouter_base_url: env_or("OPENROUTER_BASE_URL", defaults.openrouter_base_url),
            jwt_secret: env_or("JWT_SECRET", defaults.jwt_secret),
            google_client_id: env_or("GOOGLE_CLIENT_ID", String::new()),
            google_client_secret: env_or("GOOGLE_CLIENT_SECRET", String::new()),
            google_redirect_uri: env_or("GOOGLE_REDIRECT_URI", String::new()),
            ai_request_log_dir: std::env::var("AI_REQUEST_LOG_DIR").ok().map(PathBuf::from),
        }
    }

    /// 是否配置了 OpenRouter API 密钥
    pub fn has_api_key(&self) -> bool {
        !self.openrouter_api_key.is_empty()
    }

    /// 是否配置了 Google OAuth
    pub fn oauth_configured(&self) -> bool {
        !self.google_client_id.is_empty()
            && !self.google_client_secret.is_empty()
            && !self.google_redirect_uri.is_empty()
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.openrouter_base_url, "https://openrouter.ai/api");
        assert!(!config.has_api_key());
        assert!(!config.oauth_configured());
    }
}
