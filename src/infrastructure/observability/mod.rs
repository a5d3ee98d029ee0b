//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_seed_fallback,
    record_store_operation, PrometheusMetrics,
};
