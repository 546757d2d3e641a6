//! GET /cache-stats

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::CacheStatsResponse;

pub async fn cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let stats = state.cache_service.stats().await?;

    Ok(Json(stats))
}
