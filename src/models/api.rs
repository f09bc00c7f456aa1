//! REST API 请求/响应模型

use serde::{Deserialize, Deserializer, Serialize};

use super::project::Project;
use super::task::{AiSuggestions, Task, TaskPriority, TaskStatus};
use super::user::User;

/// 注册请求
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// 当前用户响应
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// 通用消息响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 通用操作响应
#[derive(Debug, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub message: String,
}

/// 创建任务请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub ai_suggestions: Option<AiSuggestions>,
}

/// 更新任务请求
///
/// `project_id` 是双层 Option：字段缺省表示不修改，显式 null 表示清除关联。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub project_id: Option<Option<String>>,
}

/// 区分「字段缺省」与「显式 null」
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// 任务列表查询参数
///
/// 过滤值为 "all" 或缺省时表示不过滤。
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
}

/// 创建任务响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    pub success: bool,
    pub message: String,
    pub task_id: String,
    pub task: Task,
}

/// 任务列表响应
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
    pub count: usize,
}

/// 单任务响应
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
}

/// 创建项目请求
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
}

/// 更新项目请求
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// 项目列表响应
#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub data: Vec<Project>,
}

/// 单项目响应
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub message: String,
    pub data: Project,
}

/// 仪表盘统计
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub todo_tasks: i64,
    pub ai_generated_tasks: i64,
    pub total_projects: i64,
    /// 完成率（0-100 的整数百分比）
    pub completion_rate: i64,
}

/// 仪表盘响应
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub stats: DashboardStats,
}

/// AI 任务建议请求
#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// AI 聊天请求
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// AI 聊天响应
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_project_id_tristate() {
        // 字段缺省：不修改
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert!(req.project_id.is_none());

        // 显式 null：清除关联
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"projectId":null}"#).unwrap();
        assert_eq!(req.project_id, Some(None));

        // 带值：改为该项目
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"projectId":"abc"}"#).unwrap();
        assert_eq!(req.project_id, Some(Some("abc".to_string())));
    }
}
