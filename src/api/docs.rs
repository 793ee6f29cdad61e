//! OpenAPI description of the probe endpoints.

use utoipa::OpenApi;

use crate::health::{
    HealthSnapshot, HealthStatus, LivenessSnapshot, LivenessStatus, ReadinessSnapshot,
    ReadinessStatus,
};

/// OpenAPI document served at `/api/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health,
        crate::api::handlers::ready,
        crate::api::handlers::live
    ),
    components(schemas(
        HealthSnapshot,
        HealthStatus,
        ReadinessSnapshot,
        ReadinessStatus,
        LivenessSnapshot,
        LivenessStatus
    )),
    tags((name = "health", description = "Health, readiness and liveness probes"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_probe_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/api/health"));
        assert!(paths.iter().any(|p| *p == "/api/health/ready"));
        assert!(paths.iter().any(|p| *p == "/api/health/live"));
    }
}
