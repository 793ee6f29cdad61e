//! Unified error types for the health service.

use thiserror::Error;

/// Unified error type for the service process.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised while evaluating a health check.
///
/// These never reach callers of the reporter. They are folded into the
/// negative status of the probe being evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealthError {
    /// A checked downstream resource is unreachable.
    #[error("dependency {dependency} unavailable: {reason}")]
    DependencyUnavailable {
        /// Name of the dependency.
        dependency: String,
        /// Reason for failure.
        reason: String,
    },

    /// The check itself malfunctioned.
    #[error("internal reporting failure: {0}")]
    InternalReportingFailure(String),
}

impl HealthError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            HealthError::DependencyUnavailable { .. } => "dependency_unavailable",
            HealthError::InternalReportingFailure(_) => "internal_reporting_failure",
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
