use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use modellab_client::{BackendClient, Orchestrator, Transport};
use modellab_core::{Action, FieldEdit, ModelLabError, ModelSelection, OperationMode, Task};
use serde_json::{json, Value};

async fn spawn_backend() -> String {
    let app = Router::new()
        .route(
            "/api/v1/infer",
            post(|Json(body): Json<Value>| async move { Json(json!({ "echo": body })) }),
        )
        .route(
            "/api/v1/finetune",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "detail": "model not found" })),
                )
            }),
        )
        .route(
            "/api/v1/detect_anomaly",
            post(|| async { "anomaly score: high" }),
        )
        .route(
            "/api/v1/broken",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_post_json_returns_body_verbatim() {
    let client = BackendClient::new(&spawn_backend().await);
    let reply = client
        .post_json("/api/v1/infer", &json!({"input_text": "hi"}))
        .await
        .unwrap();
    assert_eq!(reply, json!({"echo": {"input_text": "hi"}}));
}

#[tokio::test]
async fn test_non_2xx_uses_detail() {
    let client = BackendClient::new(&spawn_backend().await);
    let err = client
        .post_json("/api/v1/finetune", &json!({}))
        .await
        .unwrap_err();
    match err {
        ModelLabError::Backend { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_2xx_without_body_uses_status_line() {
    let client = BackendClient::new(&spawn_backend().await);
    let err = client
        .post_json("/api/v1/broken", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 503 - Service Unavailable");
}

#[tokio::test]
async fn test_2xx_with_non_json_body_is_invalid_response() {
    let client = BackendClient::new(&spawn_backend().await);
    let err = client
        .post_json("/api/v1/detect_anomaly", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelLabError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BackendClient::new(&format!("http://{}", addr));
    let err = client
        .post_json("/api/v1/infer", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelLabError::Http(_)));
}

#[tokio::test]
async fn test_orchestrator_round_trip_through_http() {
    let mut orch = Orchestrator::new(BackendClient::new(&spawn_backend().await));
    orch.dispatch(Action::SetTask(Some(Task::TextGeneration)));
    orch.dispatch(Action::SelectModel(ModelSelection::Custom));
    orch.dispatch(Action::SetCustomModelName(" openai-community/gpt2 ".to_string()));
    orch.dispatch(Action::Edit(FieldEdit::InputText("Once upon a time".to_string())));

    let outcome = orch.submit().await.clone();
    let echoed = &outcome.result().unwrap()["echo"];
    assert_eq!(echoed["model_name"], "openai-community/gpt2");
    assert_eq!(echoed["generation_args"], json!({"max_length": 50, "num_beams": 1}));
    assert!(echoed.get("context").is_none());

    orch.dispatch(Action::SetMode(OperationMode::Finetune));
    assert!(orch.outcome().result().is_none());
    orch.dispatch(Action::SelectModel(ModelSelection::from_choice("gpt2")));
    orch.dispatch(Action::Edit(FieldEdit::DatasetPath("wikitext".to_string())));

    orch.submit().await;
    assert_eq!(orch.outcome().error(), Some("model not found"));
}
