//! 仪表盘端点
//!
//! 聚合统计全部用 COUNT 查询在库内完成，不把任务整表拉到内存。

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{DashboardResponse, DashboardStats, TaskStatus};
use crate::state::AppState;

/// 仪表盘展示的最近任务条数
const RECENT_TASK_LIMIT: i64 = 5;

/// 仪表盘数据：最近任务、全部项目与聚合统计
async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let tasks = state.db.tasks().recent(&user.id, RECENT_TASK_LIMIT).await?;
    let projects = state.db.projects().list(&user.id).await?;

    let task_store = state.db.tasks();
    let total_tasks = task_store.count(&user.id).await?;
    let completed_tasks = task_store.count_by_status(&user.id, TaskStatus::Done).await?;
    let in_progress_tasks = task_store
        .count_by_status(&user.id, TaskStatus::InProgress)
        .await?;
    let todo_tasks = task_store.count_by_status(&user.id, TaskStatus::Todo).await?;
    let ai_generated_tasks = task_store.count_ai_generated(&user.id).await?;
    let total_projects = state.db.projects().count(&user.id).await?;

    let completion_rate = if total_tasks > 0 {
        ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as i64
    } else {
        0
    };

    Ok(Json(DashboardResponse {
        tasks,
        projects,
        stats: DashboardStats {
            total_tasks,
            completed_tasks,
            in_progress_tasks,
            todo_tasks,
            ai_generated_tasks,
            total_projects,
            completion_rate,
        },
    }))
}

/// 创建仪表盘路由
pub fn dashboard_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard", get(dashboard))
}
