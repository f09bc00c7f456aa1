//! 任务表操作

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{AiSuggestions, Task, TaskPriority, TaskStatus};

/// 任务行（ai_suggestions 列为 JSON 文本）
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    user_id: String,
    project_id: Option<String>,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    ai_suggestions: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        // 坏 JSON 按无建议处理，不让单条脏数据拖垮整个列表
        let ai_suggestions = row
            .ai_suggestions
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());

        Task {
            id: row.id,
            user_id: row.user_id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            ai_suggestions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 新任务参数
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub project_id: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub ai_suggestions: Option<AiSuggestions>,
}

/// 任务更新参数；None 表示不修改
///
/// `project_id` 为双层 Option：`Some(None)` 表示清除项目关联。
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<Option<String>>,
}

/// 任务列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<String>,
}

/// 任务存储
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, new: NewTask) -> Result<Task, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let suggestions_json = new
            .ai_suggestions
            .as_ref()
            .and_then(|s| serde_json::to_string(s).ok());

        sqlx::query(
            "INSERT INTO tasks \
             (id, user_id, project_id, title, description, status, priority, ai_suggestions, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&new.project_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.status)
        .bind(new.priority)
        .bind(&suggestions_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(user_id, &id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<Task>, sqlx::Error> {
        let row: Option<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    /// 按过滤条件列出任务，创建时间倒序
    pub async fn list(&self, user_id: &str, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let mut sql = String::from("SELECT * FROM tasks WHERE user_id = ?");
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.priority.is_some() {
            sql.push_str(" AND priority = ?");
        }
        if filter.project_id.is_some() {
            sql.push_str(" AND project_id = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, TaskRow>(&sql).bind(user_id);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let Some(project_id) = &filter.project_id {
            query = query.bind(project_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// 最近创建的 N 条任务
    pub async fn recent(&self, user_id: &str, limit: i64) -> Result<Vec<Task>, sqlx::Error> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks WHERE user_id = ? ORDER BY created_at DESC LIMIT ?")
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// 部分更新；任务不存在或不归属该用户时返回 None
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: TaskUpdate,
    ) -> Result<Option<Task>, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE tasks SET \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             status = COALESCE(?, status), \
             priority = COALESCE(?, priority), \
             updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.status)
        .bind(update.priority)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // 项目关联单独处理：显式 null 要写成 NULL，COALESCE 表达不了
        if let Some(project_id) = update.project_id {
            sqlx::query("UPDATE tasks SET project_id = ? WHERE id = ? AND user_id = ?")
                .bind(project_id)
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        }

        self.get(user_id, id).await
    }

    /// 删除任务；返回是否有记录被删除
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool, sqlx::Error> {
        let rows = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    pub async fn count(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn count_by_status(
        &self,
        user_id: &str,
        status: TaskStatus,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = ? AND status = ?")
            .bind(user_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
    }

    /// 带 AI 建议的任务数
    pub async fn count_ai_generated(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = ? AND ai_suggestions IS NOT NULL")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }
}
