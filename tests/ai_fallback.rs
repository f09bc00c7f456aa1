//! AI 端点的回退链路测试
//!
//! 用可编程的假服务端验证：候选模型严格按序尝试、首个成功即短路、
//! 校验失败与凭证缺失不触发任何网络调用、全部失败时降级为兜底内容。

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{post_json, spawn_mock_ai, test_app, MockBehavior};
use taskhub_backend::services::MODEL_CANDIDATES;

/// 合法的建议 JSON 内容
fn valid_suggestion_content() -> String {
    json!({
        "subtasks": ["Draft outline", "Write copy", "Review"],
        "priority": "high",
        "timeEstimate": 45,
        "tips": ["Focus on the audience"]
    })
    .to_string()
}

#[tokio::test]
async fn suggestions_first_candidate_short_circuits() {
    let (base_url, calls) = spawn_mock_ai(vec![
        (MODEL_CANDIDATES[0], MockBehavior::Content(valid_suggestion_content())),
        (MODEL_CANDIDATES[1], MockBehavior::Content(valid_suggestion_content())),
    ])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch", "description": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["aiModel"], MODEL_CANDIDATES[0]);
    assert_eq!(body["priority"], "high");
    assert_eq!(body["timeEstimate"], 45);
    assert_eq!(body["subtasks"].as_array().unwrap().len(), 3);

    // 第一个候选成功后不再尝试后续模型
    assert_eq!(*calls.lock(), vec![MODEL_CANDIDATES[0].to_string()]);
}

#[tokio::test]
async fn suggestions_fall_through_to_second_candidate() {
    let (base_url, calls) = spawn_mock_ai(vec![
        (MODEL_CANDIDATES[0], MockBehavior::Status(500)),
        (MODEL_CANDIDATES[1], MockBehavior::Content(valid_suggestion_content())),
        (MODEL_CANDIDATES[2], MockBehavior::Content(valid_suggestion_content())),
    ])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aiModel"], MODEL_CANDIDATES[1]);
    assert_eq!(body["success"], true);

    // 第三个候选永远不会被调用
    assert_eq!(
        *calls.lock(),
        vec![
            MODEL_CANDIDATES[0].to_string(),
            MODEL_CANDIDATES[1].to_string()
        ]
    );
}

#[tokio::test]
async fn suggestions_invalid_shape_tries_next_candidate() {
    let (base_url, calls) = spawn_mock_ai(vec![
        (
            MODEL_CANDIDATES[0],
            MockBehavior::Content(json!({"subtasks": []}).to_string()),
        ),
        (MODEL_CANDIDATES[1], MockBehavior::Content(valid_suggestion_content())),
    ])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (_, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch"}),
    )
    .await;

    assert_eq!(body["aiModel"], MODEL_CANDIDATES[1]);
    assert_eq!(calls.lock().len(), 2);
}

#[tokio::test]
async fn suggestions_empty_content_tries_next_candidate() {
    let (base_url, calls) = spawn_mock_ai(vec![
        (MODEL_CANDIDATES[0], MockBehavior::Empty),
        (MODEL_CANDIDATES[1], MockBehavior::Content(valid_suggestion_content())),
    ])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (_, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch"}),
    )
    .await;

    assert_eq!(body["aiModel"], MODEL_CANDIDATES[1]);
    assert_eq!(calls.lock().len(), 2);
}

#[tokio::test]
async fn suggestions_missing_fields_get_defaults() {
    let (base_url, _calls) = spawn_mock_ai(vec![(
        MODEL_CANDIDATES[0],
        MockBehavior::Content(json!({"subtasks": ["only step"]}).to_string()),
    )])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (_, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch"}),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["priority"], "medium");
    assert_eq!(body["timeEstimate"], 60);
    assert_eq!(body["tips"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn suggestions_fenced_response_is_parsed() {
    let content = format!(
        "Sure! Here is your breakdown:\n```json\n{}\n```\nHope this helps.",
        valid_suggestion_content()
    );
    let (base_url, _calls) =
        spawn_mock_ai(vec![(MODEL_CANDIDATES[0], MockBehavior::Content(content))]).await;
    let app = test_app("test-key", &base_url).await;

    let (_, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch"}),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["timeEstimate"], 45);
}

#[tokio::test]
async fn suggestions_exhaustion_returns_fallback_record() {
    // 不配置任何行为：假服务端对每个模型都返回 500
    let (base_url, calls) = spawn_mock_ai(vec![]).await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch", "description": ""}),
    )
    .await;

    // 降级仍然是 200，不向终端用户暴露硬错误
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["aiModel"], "fallback");
    assert_eq!(body["priority"], "medium");
    assert_eq!(body["timeEstimate"], 90);
    assert_eq!(
        body["subtasks"],
        json!([
            "Research and gather requirements",
            "Create a detailed action plan",
            "Break down into smaller milestones",
            "Execute step by step",
            "Review and optimize the results"
        ])
    );
    assert_eq!(body["tips"].as_array().unwrap().len(), 3);

    // 聚合错误里能看到每个候选的失败原因
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("AI temporarily unavailable"));
    for model in MODEL_CANDIDATES {
        assert!(error.contains(model), "error should mention {}", model);
    }

    // 候选按列表顺序全部试过一遍
    let recorded: Vec<String> = calls.lock().clone();
    let expected: Vec<String> = MODEL_CANDIDATES.iter().map(|m| m.to_string()).collect();
    assert_eq!(recorded, expected);
}

#[tokio::test]
async fn suggestions_missing_key_skips_network() {
    let (base_url, calls) = spawn_mock_ai(vec![(
        MODEL_CANDIDATES[0],
        MockBehavior::Content(valid_suggestion_content()),
    )])
    .await;
    let app = test_app("", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/suggestions",
        json!({"title": "Plan marketing launch", "description": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["aiModel"], "fallback");
    assert_eq!(body["priority"], "medium");
    assert_eq!(body["timeEstimate"], 90);
    assert_eq!(body["subtasks"].as_array().unwrap().len(), 5);
    assert_eq!(body["error"], "OpenRouter API key not configured");
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn suggestions_short_title_rejected_before_network() {
    let (base_url, calls) = spawn_mock_ai(vec![(
        MODEL_CANDIDATES[0],
        MockBehavior::Content(valid_suggestion_content()),
    )])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(&app.router, "/api/ai/suggestions", json!({"title": "Wr"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["field"], "title");
    assert!(body["error"].as_str().unwrap().contains("title"));
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn chat_first_candidate_short_circuits() {
    let (base_url, calls) = spawn_mock_ai(vec![(
        MODEL_CANDIDATES[0],
        MockBehavior::Content("Try timeboxing your mornings.".to_string()),
    )])
    .await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/chat",
        json!({"message": "How do I plan my week?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "Try timeboxing your mornings.");
    assert_eq!(calls.lock().len(), 1);
}

#[tokio::test]
async fn chat_accepts_message_of_exactly_1000_chars() {
    let (base_url, _calls) = spawn_mock_ai(vec![(
        MODEL_CANDIDATES[0],
        MockBehavior::Content("ok".to_string()),
    )])
    .await;
    let app = test_app("test-key", &base_url).await;

    let message = "a".repeat(1000);
    let (status, body) = post_json(&app.router, "/api/ai/chat", json!({ "message": message })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn chat_rejects_message_of_1001_chars() {
    let (base_url, calls) = spawn_mock_ai(vec![(
        MODEL_CANDIDATES[0],
        MockBehavior::Content("ok".to_string()),
    )])
    .await;
    let app = test_app("test-key", &base_url).await;

    let message = "a".repeat(1001);
    let (status, body) = post_json(&app.router, "/api/ai/chat", json!({ "message": message })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "message");
    assert!(body["error"].as_str().unwrap().contains("1000"));
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn chat_rejects_empty_message() {
    let (base_url, calls) = spawn_mock_ai(vec![]).await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(&app.router, "/api/ai/chat", json!({"message": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "message");
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn chat_exhaustion_returns_apology() {
    let (base_url, calls) = spawn_mock_ai(vec![]).await;
    let app = test_app("test-key", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/chat",
        json!({"message": "How do I plan my week?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["response"],
        "I'm having trouble connecting to the AI service right now. Please try again in a moment."
    );
    assert!(body["error"].as_str().unwrap().contains("all models failed"));
    assert_eq!(calls.lock().len(), MODEL_CANDIDATES.len());
}

#[tokio::test]
async fn chat_missing_key_returns_demo_notice() {
    let (base_url, calls) = spawn_mock_ai(vec![]).await;
    let app = test_app("", &base_url).await;

    let (status, body) = post_json(
        &app.router,
        "/api/ai/chat",
        json!({"message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["response"].as_str().unwrap().contains("demo mode"));
    assert!(calls.lock().is_empty());
}
