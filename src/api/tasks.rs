//! 任务 CRUD 端点
//!
//! 所有操作都限定在当前登录用户名下；按 id 的更新/删除对不存在
//! 与不归属一视同仁，返回 404，不泄露他人任务是否存在。

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{NewTask, TaskFilter, TaskUpdate};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTaskRequest, CreateTaskResponse, SimpleResponse, TaskListQuery, TaskPriority,
    TaskResponse, TaskStatus, TasksResponse, UpdateTaskRequest,
};
use crate::state::AppState;

/// 任务标题的最大长度（字符）
const MAX_TITLE_LENGTH: usize = 200;

/// 校验标题
fn validate_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() {
        return Err(AppError::Validation {
            field: "title",
            message: "Title is required".to_string(),
        });
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation {
            field: "title",
            message: "Title must be less than 200 characters".to_string(),
        });
    }
    Ok(())
}

/// 解析项目关联：前端用 "none" 占位表示未关联
fn parse_project_id(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw {
        None | Some("") | Some("none") => Ok(None),
        Some(id) => {
            if Uuid::parse_str(id).is_err() {
                return Err(AppError::Validation {
                    field: "projectId",
                    message: "Invalid project ID".to_string(),
                });
            }
            Ok(Some(id.to_string()))
        }
    }
}

/// 创建任务
async fn create_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> AppResult<Json<CreateTaskResponse>> {
    let title = req.title.trim();
    validate_title(title)?;

    let project_id = parse_project_id(req.project_id.as_deref())?;

    let task = state
        .db
        .tasks()
        .create(
            &user.id,
            NewTask {
                title: title.to_string(),
                description: req
                    .description
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
                project_id,
                status: req.status.unwrap_or_default(),
                priority: req.priority.unwrap_or_default(),
                ai_suggestions: req.ai_suggestions,
            },
        )
        .await?;

    info!("Task created: id={}", task.id);

    Ok(Json(CreateTaskResponse {
        success: true,
        message: "Task created successfully".to_string(),
        task_id: task.id.clone(),
        task,
    }))
}

/// 解析查询参数里的过滤值；"all" 与缺省都表示不过滤
fn parse_filter_value<T: FromStr>(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, AppError> {
    match raw {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| AppError::Validation {
            field,
            message: format!("Invalid {} value", field),
        }),
    }
}

/// 按过滤条件列出任务
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<TasksResponse>> {
    let project_id = match query.project.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => parse_project_id(Some(raw))?,
    };

    let filter = TaskFilter {
        status: parse_filter_value::<TaskStatus>(query.status.as_deref(), "status")?,
        priority: parse_filter_value::<TaskPriority>(query.priority.as_deref(), "priority")?,
        project_id,
    };

    let tasks = state.db.tasks().list(&user.id, &filter).await?;
    let count = tasks.len();

    Ok(Json(TasksResponse { tasks, count }))
}

/// 部分更新任务
async fn update_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let title = match req.title {
        Some(raw) => {
            let trimmed = raw.trim().to_string();
            validate_title(&trimmed)?;
            Some(trimmed)
        }
        None => None,
    };

    let project_id = match req.project_id {
        Some(Some(raw)) => Some(parse_project_id(Some(raw.as_str()))?),
        Some(None) => Some(None),
        None => None,
    };

    let update = TaskUpdate {
        title,
        description: req.description.map(|d| d.trim().to_string()),
        status: req.status,
        priority: req.priority,
        project_id,
    };

    let task = state
        .db
        .tasks()
        .update(&user.id, &id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found or unauthorized".to_string()))?;

    Ok(Json(TaskResponse {
        success: true,
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// 删除任务
async fn delete_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SimpleResponse>> {
    let deleted = state.db.tasks().delete(&user.id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound(
            "Task not found or unauthorized".to_string(),
        ));
    }

    info!("Task deleted: id={}", id);

    Ok(Json(SimpleResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
    }))
}

/// 创建任务路由
pub fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/:id", patch(update_task).delete(delete_task))
}
