//! API 路由模块

mod ai;
mod auth;
mod dashboard;
mod health;
mod projects;
mod tasks;

pub use ai::ai_routes;
pub use auth::auth_routes;
pub use dashboard::dashboard_routes;
pub use health::health_routes;
pub use projects::project_routes;
pub use tasks::task_routes;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(task_routes())
        .merge(project_routes())
        .merge(dashboard_routes())
        .merge(ai_routes())
        .with_state(state)
}
