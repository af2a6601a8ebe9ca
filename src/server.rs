use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State as AxumState,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;

use crate::binding::BoundField;
use crate::engine::FieldGenerator;
use crate::error::AppError;

/// Shared state for the generation HTTP server.
pub struct ServerState {
    pub generator: FieldGenerator,
}

#[derive(Debug, Deserialize)]
struct GenFormRequest {
    #[serde(rename = "interfaceDefinition", default)]
    interface_definition: Option<serde_json::Value>,
}

/// Routes of the generation service.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(
            "/api/genform",
            post(handle_genform).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on `addr` until the shutdown signal fires.
pub async fn start_server(
    addr: SocketAddr,
    state: Arc<ServerState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Form builder server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait until the shutdown signal is sent
            let _ = shutdown_rx.changed().await;
            tracing::info!("Form builder server shutting down");
        })
        .await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "form-builder" }))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}

/// `POST /api/genform`: infer form fields from `{ interfaceDefinition }`.
async fn handle_genform(
    AxumState(state): AxumState<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<Vec<BoundField>>, AppError> {
    let request: GenFormRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejected genform body: {}", e);
        AppError::invalid_input()
    })?;

    let fields = state
        .generator
        .generate(request.interface_definition.as_ref())
        .await?;

    Ok(Json(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::provider::testing::ScriptedProvider;
    use crate::engine::provider::CompletionProvider;
    use crate::error::{GENERATION_FAILURE_MESSAGE, INVALID_INPUT_MESSAGE};
    use crate::models::FieldVariant;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    const REPLY: &str = r#"[
        {"name":"name","type":"string","variant":"Input","label":"Name","placeholder":"Your name","required":true,"disabled":false,"checked":false,"value":""}
    ]"#;

    fn app(provider: Arc<dyn CompletionProvider>) -> Router {
        router(Arc::new(ServerState {
            generator: FieldGenerator::new(provider, "gpt-4o", 1500),
        }))
    }

    async fn call(app: Router, method: Method, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method(method)
            .uri("/api/genform")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_generates_fields() {
        let app = app(Arc::new(ScriptedProvider::replying(REPLY)));
        let (status, body) = call(
            app,
            Method::POST,
            r#"{"interfaceDefinition":{"name":"string"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let fields = body.as_array().unwrap();
        assert_eq!(fields.len(), 1);
        for field in fields {
            for key in ["name", "type", "variant", "label"] {
                assert!(field.get(key).is_some(), "missing {key}");
            }
            let variant: FieldVariant = serde_json::from_value(field["variant"].clone()).unwrap();
            assert!(FieldVariant::ALL.contains(&variant));
        }
        assert_eq!(fields[0]["rowIndex"], 0);
    }

    #[tokio::test]
    async fn test_missing_definition_is_400() {
        let provider = Arc::new(ScriptedProvider::replying(REPLY));
        for body in [
            "{}",
            r#"{"interfaceDefinition":null}"#,
            r#"{"interfaceDefinition":false}"#,
            r#"{"interfaceDefinition":0}"#,
            r#"{"interfaceDefinition":""}"#,
        ] {
            let (status, resp) = call(app(provider.clone()), Method::POST, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(resp["error"], INVALID_INPUT_MESSAGE);
        }
        assert_eq!(provider.request_count(), 0);
    }

    #[tokio::test]
    async fn test_generated_values_pass_through_unchanged() {
        let reply = r#"[
            {"name":"start","type":"date","variant":"Datetime Picker","label":"Start","value":"2024-05-01T10:00:00+02:00"},
            {"name":"seats","type":"number","variant":"Slider","label":"Seats","value":4}
        ]"#;
        let app = app(Arc::new(ScriptedProvider::replying(reply)));
        let (status, body) = call(
            app,
            Method::POST,
            r#"{"interfaceDefinition":{"start":"Date","seats":"number"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["value"], "2024-05-01T10:00:00+02:00");
        assert_eq!(body[1]["value"].as_u64(), Some(4));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = app(Arc::new(ScriptedProvider::replying(REPLY)));
        let (status, body) = call(app, Method::POST, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_INPUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_downstream_failure_is_500() {
        let app = app(Arc::new(ScriptedProvider::failing("upstream 502")));
        let (status, body) = call(
            app,
            Method::POST,
            r#"{"interfaceDefinition":"interface A { b: string }"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERATION_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_post_is_405() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let app = app(Arc::new(ScriptedProvider::replying(REPLY)));
            let (status, body) = call(app, method, "").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(ScriptedProvider::replying(REPLY)));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
