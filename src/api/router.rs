use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::MetricsConfig;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

use super::health;
use super::keys;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;

/// Create the full router with application state
///
/// The metrics endpoint is merged in only when an exporter was installed.
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_config: &MetricsConfig,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", keys::create_keys_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, &metrics_config.path));
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::domain::storage::mock::MockRecordStore;
    use crate::infrastructure::api_key::KeyStore;

    fn app() -> Router {
        let state = AppState::new(KeyStore::with_store(Arc::new(MockRecordStore::new())));
        create_router(state, None, &MetricsConfig::default())
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        assert_eq!(get(app(), "/health").await.status(), StatusCode::OK);
        assert_eq!(get(app(), "/live").await.status(), StatusCode::OK);

        let response = get(app(), "/ready").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["checks"][0]["backend"], "file");
    }

    #[tokio::test]
    async fn test_keys_are_nested_under_api() {
        let response = get(app(), "/api/keys").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get(app(), "/keys").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_route_absent_without_exporter() {
        assert_eq!(get(app(), "/metrics").await.status(), StatusCode::NOT_FOUND);
    }
}
