//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use self::metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_sync_tick,
    set_cache_entries, PrometheusMetrics,
};
