//! 项目表操作

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Project;

/// 新项目参数
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub color: String,
}

/// 项目更新参数；None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// 项目存储
pub struct ProjectStore {
    pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, new: NewProject) -> Result<Project, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO projects (id, user_id, name, description, color, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.color)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(user_id, &id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM projects WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// 列出用户的所有项目，创建时间倒序
    pub async fn list(&self, user_id: &str) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM projects WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    /// 部分更新；项目不存在或不归属该用户时返回 None
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: ProjectUpdate,
    ) -> Result<Option<Project>, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE projects SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             color = COALESCE(?, color), \
             updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.color)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(user_id, id).await
    }

    /// 删除项目；返回是否有记录被删除
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool, sqlx::Error> {
        let rows = sqlx::query("DELETE FROM projects WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    pub async fn count(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }
}
