//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, live, metrics, openapi, ready, AppState};

/// Create the API router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // Probe endpoints
        .route("/api/health", get(health))
        .route("/api/health/ready", get(ready))
        .route("/api/health/live", get(live))
        .route("/api/openapi.json", get(openapi))
        .layer(cors)
        // Scrape endpoint, outside the browser-facing CORS policy
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cors::cors_layer;
    use crate::config::Config;
    use crate::error::HealthError;
    use crate::health::{
        check_fn, FixedClock, HealthReporter, HealthSnapshot, HealthStatus, LivenessSnapshot,
        LivenessStatus, Probe, ReadinessSnapshot, ReadinessStatus, ServiceIdentity,
    };
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use time::macros::datetime;
    use tower::ServiceExt;

    fn identity() -> Arc<ServiceIdentity> {
        Arc::new(ServiceIdentity::new("transaction-service", "1.0.0-SNAPSHOT"))
    }

    fn app_with(reporter: HealthReporter) -> Router {
        create_router(AppState::new(reporter), cors_layer(&Config::default()))
    }

    fn app() -> Router {
        let clock = Arc::new(FixedClock::new(datetime!(2024-03-15 09:30:00 UTC)));
        app_with(HealthReporter::builder(identity()).clock(clock).build())
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_up() {
        let response = get(app(), "/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: HealthSnapshot = body_json(response).await;
        assert_eq!(
            snapshot,
            HealthSnapshot {
                status: HealthStatus::Up,
                service: "transaction-service".to_string(),
                version: "1.0.0-SNAPSHOT".to_string(),
                timestamp: datetime!(2024-03-15 09:30:00 UTC),
            }
        );
    }

    #[tokio::test]
    async fn ready_endpoint_returns_ready_without_version() {
        let response = get(app(), "/api/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);

        let value: serde_json::Value = body_json(response).await;
        assert_eq!(value["status"], "READY");
        assert_eq!(value["service"], "transaction-service");
        assert_eq!(value["timestamp"], "2024-03-15T09:30:00Z");
        assert!(value.get("version").is_none());
    }

    #[tokio::test]
    async fn live_endpoint_returns_alive() {
        let response = get(app(), "/api/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: LivenessSnapshot = body_json(response).await;
        assert_eq!(snapshot.status, LivenessStatus::Alive);
        assert_eq!(snapshot.service, "transaction-service");
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_when_check_fails() {
        let reporter = HealthReporter::builder(identity())
            .check(
                Probe::Readiness,
                check_fn("redis", || {
                    Err(HealthError::DependencyUnavailable {
                        dependency: "redis".to_string(),
                        reason: "connection refused".to_string(),
                    })
                }),
            )
            .build();
        let app = app_with(reporter);

        let response = get(app.clone(), "/api/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let snapshot: ReadinessSnapshot = body_json(response).await;
        assert_eq!(snapshot.status, ReadinessStatus::NotReady);

        let response = get(app, "/api/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_endpoint_returns_503_when_check_panics() {
        let reporter = HealthReporter::builder(identity())
            .check(Probe::Health, check_fn("broken", || panic!("boom")))
            .build();

        let response = get(app_with(reporter), "/api/health").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let snapshot: HealthSnapshot = body_json(response).await;
        assert_eq!(snapshot.status, HealthStatus::Down);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let response = get(app(), "/api/health/unknown").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = get(app(), "/api/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc: serde_json::Value = body_json(response).await;
        assert!(doc["paths"]["/api/health/ready"].is_object());
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_404_without_recorder() {
        let response = get(app(), "/metrics").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_with_recorder() {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder()
            .handle();
        let state = AppState::new(HealthReporter::new(identity())).with_metrics(handle);
        let app = create_router(state, cors_layer(&Config::default()));

        let response = get(app, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn cors_preflight_allows_vercel_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/health")
            .header(header::ORIGIN, "https://preview.vercel.app")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://preview.vercel.app"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
    }

    #[tokio::test]
    async fn cors_rejects_unknown_origin() {
        let request = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "https://evil.example.com")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
