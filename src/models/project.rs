//! 项目领域模型

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 项目实体
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    /// 展示颜色，`#RRGGBB` 格式
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
