//! GET /history

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::HistoryItem;

/// Every served request, newest first
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let history = state.cache_service.history().await?;

    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::cache::create_cache_router;
    use crate::api::cache::test_support::{answering, state_with};

    #[tokio::test]
    async fn test_history_newest_first() {
        let app = create_cache_router().with_state(state_with(answering("A")));

        for (text, vector) in [("First", "[1.0, 0.0]"), ("Second", "[0.0, 1.0]")] {
            let request = Request::builder()
                .method("POST")
                .uri("/chat")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"text": "{}", "vector": {}}}"#,
                    text, vector
                )))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(Request::get("/history").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let items = json.as_array().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["question"], "Second");
        assert_eq!(items[0]["source"], "CLOUD");
        assert_eq!(items[0]["saved"], false);
        assert!(items[0].get("tokensSaved").is_none());
    }
}
