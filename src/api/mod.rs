//! HTTP API module for the probe, OpenAPI and metrics endpoints.

pub mod cors;
pub mod docs;
pub mod handlers;
pub mod routes;

pub use cors::cors_layer;
pub use handlers::AppState;
pub use routes::create_router;
