//! HTTP server for health checks and Prometheus metrics
//!
//! Listens on the port the container declares (HTTP_PORT, default 80) and
//! exposes:
//! - `/health` - liveness with uptime
//! - `/ready`  - readiness, pings the expense store
//! - `/metrics` - Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::storage::ExpenseStore;

/// Shared state for the HTTP handlers
#[derive(Clone)]
struct ServerState {
    start_time: Instant,
    store: Arc<dyn ExpenseStore>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
    uptime_human: String,
    service: &'static str,
    version: &'static str,
}

/// Builds the router; split out so tests can drive it without a socket.
pub fn router(store: Arc<dyn ExpenseStore>) -> Router {
    let state = ServerState {
        start_time: Instant::now(),
        store,
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(Arc::new(state))
}

/// Start the HTTP server and serve until the process exits.
pub async fn start_http_server(port: u16, store: Arc<dyn ExpenseStore>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    log::info!("Starting HTTP server on http://{}", addr);
    log::info!("  /health  - liveness");
    log::info!("  /ready   - readiness (database ping)");
    log::info!("  /metrics - Prometheus metrics");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router(store)).await?;

    Ok(())
}

async fn health_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed();

    let body = HealthResponse {
        status: "healthy",
        uptime_seconds: uptime.as_secs(),
        uptime_human: format_duration(uptime),
        service: "fintrack-bot",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(body))
}

async fn ready_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "database": "ok" })),
        ),
        Err(e) => {
            log::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable", "database": e.to_string() })),
            )
        }
    }
}

async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => ([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode metrics: {}", e)).into_response()
        }
    }
}

/// Formats a duration as `1d 2h 3m 4s`, dropping leading zero units.
fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(3_725)), "1h 2m 5s");
        assert_eq!(format_duration(Duration::from_secs(90_061)), "1d 1h 1m 1s");
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let app = router(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "fintrack-bot");
    }

    #[tokio::test]
    async fn test_ready_reflects_store_availability() {
        let store = Arc::new(MemoryStore::new());
        let app = router(store.clone());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        store.set_unavailable(true);
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_text() {
        crate::core::metrics::init_metrics();
        let app = router(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
