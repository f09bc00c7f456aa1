//! 应用状态管理
//!
//! 配置、数据库句柄与 AI 服务都在进程启动时构造一次，
//! 用 Arc 包裹后在处理器之间共享。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Database;
use crate::services::{ChatService, SuggestionService};
use crate::utils::RequestLogger;

/// 应用共享状态
pub struct AppState {
    /// 应用配置
    pub config: AppConfig,
    /// 数据库句柄
    pub db: Database,
    /// 任务建议服务
    pub suggestions: SuggestionService,
    /// 聊天服务
    pub chat: ChatService,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: AppConfig, db: Database) -> Self {
        let logger = Arc::new(RequestLogger::new(config.ai_request_log_dir.clone()));
        Self {
            suggestions: SuggestionService::new(&config, Arc::clone(&logger)),
            chat: ChatService::new(&config, logger),
            config,
            db,
        }
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(config: AppConfig, db: Database) -> Arc<AppState> {
    Arc::new(AppState::new(config, db))
}
