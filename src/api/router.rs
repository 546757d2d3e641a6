use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::cache;
use super::health;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// CORS for the browser front-end. An unparsable origin disables CORS.
pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(origin = %allowed_origin, error = %e, "Invalid CORS origin; cross-origin requests disabled");
            layer
        }
    }
}

/// Create the full router with application state
pub fn create_router_with_state(
    state: AppState,
    allowed_origin: &str,
    metrics: Option<(PrometheusMetrics, String)>,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(cache::create_cache_router())
        .with_state(state);

    if let Some((metrics, path)) = metrics {
        router = router.merge(create_metrics_router(metrics, &path));
    }

    router
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
}
