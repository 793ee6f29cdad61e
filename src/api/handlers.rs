//! HTTP API handlers.

use std::fmt;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use utoipa::OpenApi;

use super::docs::ApiDoc;
use crate::health::{HealthReporter, HealthSnapshot, LivenessSnapshot, ReadinessSnapshot};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot source for the probe endpoints.
    pub reporter: HealthReporter,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state without a metrics endpoint.
    pub fn new(reporter: HealthReporter) -> Self {
        Self {
            reporter,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("reporter", &self.reporter)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

fn probe_status(passing: bool) -> StatusCode {
    if passing {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// General health - 200 when UP, 503 when DOWN.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthSnapshot),
        (status = 503, description = "Service is down", body = HealthSnapshot)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.reporter.report_health();
    (probe_status(snapshot.status.is_passing()), Json(snapshot))
}

/// Readiness probe - 200 when READY, 503 otherwise.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Accepting traffic", body = ReadinessSnapshot),
        (status = 503, description = "Not accepting traffic", body = ReadinessSnapshot)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.reporter.report_readiness();
    (probe_status(snapshot.status.is_passing()), Json(snapshot))
}

/// Liveness probe - 200 when ALIVE, 503 otherwise.
#[utoipa::path(
    get,
    path = "/api/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive", body = LivenessSnapshot),
        (status = 503, description = "Process should be restarted", body = LivenessSnapshot)
    )
)]
pub async fn live(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.reporter.report_liveness();
    (probe_status(snapshot.status.is_passing()), Json(snapshot))
}

/// OpenAPI document for the probe endpoints.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
