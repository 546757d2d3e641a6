//! Semantic cache endpoints

pub mod chat;
pub mod history;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_cache_router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/history", get(history::list_history))
        .route("/cache-stats", get(stats::cache_stats))
}
