//! Health, readiness and liveness reporting for the transaction service.
//!
//! The core is transport-agnostic: a [`health::HealthReporter`] holds the
//! process identity and a clock, and hands out fresh snapshots on demand.
//! Deployment tooling asks three separate questions:
//!
//! ```text
//! GET /api/health        -> {status: UP,    service, version, timestamp}
//! GET /api/health/ready  -> {status: READY, service, timestamp}
//! GET /api/health/live   -> {status: ALIVE, service, timestamp}
//! ```
//!
//! Liveness drives restarts, readiness drives traffic admission, and general
//! health is informational. Checks can be plugged in behind each question
//! without touching callers; a failing check is reported as data.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`health`]: Identity, snapshots, clocks, checks and the reporter
//! - [`api`]: HTTP adapter for the probes
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{HealthError, Result, ServiceError};
pub use health::{HealthReporter, ServiceIdentity};
