//! 领域模型与 API 模型

mod api;
mod project;
mod task;
mod user;

pub use api::*;
pub use project::Project;
pub use task::{AiSuggestions, Task, TaskPriority, TaskStatus};
pub use user::User;
