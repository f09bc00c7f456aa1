//! 用户表操作

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::User;

/// 用户行（含口令哈希，仅存储层与认证流程可见）
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

/// 用户存储
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 创建用户；OAuth 用户的 password_hash 为空
    pub async fn create(
        &self,
        name: Option<&str>,
        email: &str,
        password_hash: Option<&str>,
        image: Option<&str>,
    ) -> Result<UserRow, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, image, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(image)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// OAuth 登录：按邮箱更新或创建用户
    pub async fn upsert_oauth(
        &self,
        name: Option<&str>,
        email: &str,
        image: Option<&str>,
    ) -> Result<UserRow, sqlx::Error> {
        if let Some(existing) = self.find_by_email(email).await? {
            sqlx::query(
                "UPDATE users SET name = COALESCE(?, name), image = COALESCE(?, image) \
                 WHERE id = ?",
            )
            .bind(name)
            .bind(image)
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

            return self
                .find_by_id(&existing.id)
                .await?
                .ok_or(sqlx::Error::RowNotFound);
        }

        self.create(name, email, None, image).await
    }
}
