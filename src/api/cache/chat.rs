//! POST /chat

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, ChatResponse, Json};

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.text.trim().is_empty() || request.vector.is_empty() {
        return Err(ApiError::bad_request("text and vector are required"));
    }

    let response = state
        .cache_service
        .lookup(&request.text, &request.vector, request.model.as_deref())
        .await?;

    info!(source = ?response.source, dimensions = request.vector.len(), "Chat request served");

    Ok(Json(ChatResponse::from(response)))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::api::cache::create_cache_router;
    use crate::api::cache::test_support::{answering, failing, state_with};
    use crate::api::types::ChatResponse;
    use crate::domain::llm::MockTextGenerator;

    fn app(generator: MockTextGenerator) -> Router {
        create_cache_router().with_state(state_with(generator))
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn chat_response(response: axum::response::Response) -> ChatResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_miss_then_hit() {
        let app = app(answering("Fresh answer"));
        let body = r#"{"text": "What is Rust?", "vector": [0.6, 0.8]}"#;

        let first = app.clone().oneshot(post_chat(body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = chat_response(first).await;
        assert_eq!(first.source, "CLOUD");
        assert_eq!(first.answer, "Fresh answer");

        let second = app.oneshot(post_chat(body)).await.unwrap();
        let second = chat_response(second).await;
        assert_eq!(second.source, "CACHE");
        assert_eq!(second.answer, "Fresh answer");
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_text() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let response = app(generator)
            .oneshot(post_chat(r#"{"text": "  ", "vector": [1.0]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_vector() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let response = app(generator)
            .oneshot(post_chat(r#"{"text": "Hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_json() {
        let response = app(MockTextGenerator::new())
            .oneshot(post_chat("{oops"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure_is_bad_gateway() {
        let response = app(failing())
            .oneshot(post_chat(r#"{"text": "Hello", "vector": [1.0]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
