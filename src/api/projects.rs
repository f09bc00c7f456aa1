//! 项目 CRUD 端点

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{NewProject, ProjectUpdate};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProjectRequest, ProjectResponse, ProjectsResponse, SimpleResponse, UpdateProjectRequest,
};
use crate::state::AppState;

/// 项目名称的最大长度（字符）
const MAX_NAME_LENGTH: usize = 100;

/// 展示颜色格式：`#RRGGBB`
static COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// 校验项目名称
fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::Validation {
            field: "name",
            message: "Project name is required".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation {
            field: "name",
            message: "Project name must be less than 100 characters".to_string(),
        });
    }
    Ok(())
}

/// 校验展示颜色
fn validate_color(color: &str) -> Result<(), AppError> {
    if !COLOR_RE.is_match(color) {
        return Err(AppError::Validation {
            field: "color",
            message: "Invalid color format".to_string(),
        });
    }
    Ok(())
}

/// 创建项目
async fn create_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let name = req.name.trim();
    validate_name(name)?;
    validate_color(&req.color)?;

    let project = state
        .db
        .projects()
        .create(
            &user.id,
            NewProject {
                name: name.to_string(),
                description: req
                    .description
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
                color: req.color,
            },
        )
        .await?;

    info!("Project created: id={}", project.id);

    Ok(Json(ProjectResponse {
        success: true,
        message: "Project created successfully".to_string(),
        data: project,
    }))
}

/// 列出当前用户的所有项目
async fn list_projects(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<ProjectsResponse>> {
    let projects = state.db.projects().list(&user.id).await?;

    Ok(Json(ProjectsResponse {
        success: true,
        data: projects,
    }))
}

/// 部分更新项目
async fn update_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let name = match req.name {
        Some(raw) => {
            let trimmed = raw.trim().to_string();
            validate_name(&trimmed)?;
            Some(trimmed)
        }
        None => None,
    };

    if let Some(color) = req.color.as_deref() {
        validate_color(color)?;
    }

    let update = ProjectUpdate {
        name,
        description: req.description.map(|d| d.trim().to_string()),
        color: req.color,
    };

    let project = state
        .db
        .projects()
        .update(&user.id, &id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found or unauthorized".to_string()))?;

    Ok(Json(ProjectResponse {
        success: true,
        message: "Project updated successfully".to_string(),
        data: project,
    }))
}

/// 删除项目
async fn delete_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SimpleResponse>> {
    let deleted = state.db.projects().delete(&user.id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound(
            "Project not found or unauthorized".to_string(),
        ));
    }

    info!("Project deleted: id={}", id);

    Ok(Json(SimpleResponse {
        success: true,
        message: "Project deleted successfully".to_string(),
    }))
}

/// 创建项目路由
pub fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            patch(update_project).delete(delete_project),
        )
}
