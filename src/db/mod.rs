//! 数据库连接与存储层
//!
//! 连接句柄由组合根显式构造并随 AppState 传递，不使用全局缓存。
//! 所有存储操作都按归属用户过滤，不存在跨用户访问路径。

mod project_store;
mod task_store;
mod user_store;

pub use project_store::{NewProject, ProjectStore, ProjectUpdate};
pub use task_store::{NewTask, TaskFilter, TaskStore, TaskUpdate};
pub use user_store::{UserRow, UserStore};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// 数据库句柄
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// 连接数据库并初始化表结构
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// 建表与索引（幂等）
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            TEXT PRIMARY KEY,
                name          TEXT,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT,
                image         TEXT,
                created_at    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                color       TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id             TEXT PRIMARY KEY,
                user_id        TEXT NOT NULL,
                project_id     TEXT,
                title          TEXT NOT NULL,
                description    TEXT NOT NULL DEFAULT '',
                status         TEXT NOT NULL DEFAULT 'todo',
                priority       TEXT NOT NULL DEFAULT 'medium',
                ai_suggestions TEXT,
                created_at     TEXT NOT NULL,
                updated_at     TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_user ON projects(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_user_status ON tasks(user_id, status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 用户存储
    pub fn users(&self) -> UserStore {
        UserStore::new(self.pool.clone())
    }

    /// 任务存储
    pub fn tasks(&self) -> TaskStore {
        TaskStore::new(self.pool.clone())
    }

    /// 项目存储
    pub fn projects(&self) -> ProjectStore {
        ProjectStore::new(self.pool.clone())
    }
}
