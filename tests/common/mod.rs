//! 集成测试共用设施
//!
//! 提供一个可编程的 Chat Completions 假服务端（按模型名决定行为并
//! 记录调用顺序），以及基于临时 SQLite 文件的应用状态夹具。

// 每个测试二进制各自编译本模块，用不到的夹具不必告警
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use tempfile::TempDir;
use tower::ServiceExt;

use taskhub_backend::config::AppConfig;
use taskhub_backend::db::Database;
use taskhub_backend::state::{create_shared_state, AppState};

/// 假服务端对某个模型的行为
#[derive(Clone)]
pub enum MockBehavior {
    /// 200，choices[0].message.content 为给定文本
    Content(String),
    /// 200，但内容为空串
    Empty,
    /// 指定的非 2xx 状态码
    Status(u16),
}

#[derive(Clone)]
struct MockState {
    behaviors: Arc<HashMap<String, MockBehavior>>,
    calls: Arc<Mutex<Vec<String>>>,
}

async fn completions_handler(
    State(state): State<MockState>,
    Json(payload): Json<serde_json::Value>,
) -> axum::response::Response {
    let model = payload["model"].as_str().unwrap_or_default().to_string();
    state.calls.lock().push(model.clone());

    match state.behaviors.get(&model) {
        Some(MockBehavior::Content(text)) => Json(serde_json::json!({
            "choices": [{"message": {"content": text}}]
        }))
        .into_response(),
        Some(MockBehavior::Empty) => Json(serde_json::json!({
            "choices": [{"message": {"content": ""}}]
        }))
        .into_response(),
        Some(MockBehavior::Status(code)) => (
            StatusCode::from_u16(*code).unwrap(),
            "mock provider failure",
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no behavior configured").into_response(),
    }
}

/// 启动假 AI 服务端，返回 base_url 与调用记录
pub async fn spawn_mock_ai(
    behaviors: Vec<(&str, MockBehavior)>,
) -> (String, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        behaviors: Arc::new(
            behaviors
                .into_iter()
                .map(|(model, behavior)| (model.to_string(), behavior))
                .collect(),
        ),
        calls: Arc::clone(&calls),
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(completions_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), calls)
}

/// 测试应用：临时数据库 + 指定的 AI 配置
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    _tmp: TempDir,
}

/// 构建测试应用状态与路由
pub async fn test_app(api_key: &str, base_url: &str) -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_url: format!("sqlite://{}", tmp.path().join("test.db").display()),
        openrouter_api_key: api_key.to_string(),
        openrouter_base_url: base_url.to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        ai_request_log_dir: Some(tmp.path().join("logs")),
        ..AppConfig::default()
    };

    let db = Database::connect(&config.database_url).await.unwrap();
    let state = create_shared_state(config, db);
    let router = taskhub_backend::api::create_api_routes(Arc::clone(&state));

    TestApp {
        state,
        router,
        _tmp: tmp,
    }
}

/// 发送 JSON 请求并解出响应（可选 Bearer 令牌）
pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// POST JSON 的简写
pub async fn post_json(
    router: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request_json(router, "POST", uri, None, Some(body)).await
}
