//! AI Task Manager - Rust Backend
//!
//! 使用 axum 框架构建的后端服务，提供用户认证、任务/项目管理与 AI 建议功能。

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskhub_backend::api::create_api_routes;
use taskhub_backend::config::AppConfig;
use taskhub_backend::db::Database;
use taskhub_backend::state::create_shared_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Task Manager backend...");

    // 加载配置
    let config = AppConfig::from_env();
    if !config.has_api_key() {
        info!("OPENROUTER_API_KEY not set, AI endpoints will serve fallback content");
    }

    // 连接数据库（组合根显式构造，随 AppState 传递）
    let db = Database::connect(&config.database_url).await?;
    info!("Database ready: {}", config.database_url);

    // 创建共享状态
    let state = create_shared_state(config, db);

    // 配置 CORS（允许所有来源）
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 构建路由
    let app = Router::new()
        .merge(create_api_routes(Arc::clone(&state)))
        .layer(cors);

    // 绑定地址
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    info!("Server listening on: {}", addr);

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
