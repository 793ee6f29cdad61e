//! Snapshot and identity types reported by the probes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Process identity, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    name: String,
    version: String,
}

impl ServiceIdentity {
    /// Create a new identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service version.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// The three questions a reporter can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Probe {
    /// Is the process up.
    #[strum(serialize = "health")]
    Health,
    /// Is the process ready to accept work.
    #[strum(to_string = "readiness", serialize = "ready")]
    Readiness,
    /// Is the process alive.
    #[strum(to_string = "liveness", serialize = "live")]
    Liveness,
}

/// General health status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    /// Service is up.
    Up,
    /// Service is down.
    Down,
}

/// Readiness status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessStatus {
    /// Accepting traffic.
    Ready,
    /// Not accepting traffic.
    NotReady,
}

/// Liveness status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LivenessStatus {
    /// Process is alive.
    Alive,
    /// Process should be restarted.
    NotAlive,
}

impl HealthStatus {
    /// Pick the status for a check outcome.
    pub fn from_passing(passing: bool) -> Self {
        if passing {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        }
    }

    /// Whether this is the good value.
    pub fn is_passing(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }
}

impl ReadinessStatus {
    /// Pick the status for a check outcome.
    pub fn from_passing(passing: bool) -> Self {
        if passing {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        }
    }

    /// Whether this is the good value.
    pub fn is_passing(&self) -> bool {
        matches!(self, ReadinessStatus::Ready)
    }
}

impl LivenessStatus {
    /// Pick the status for a check outcome.
    pub fn from_passing(passing: bool) -> Self {
        if passing {
            LivenessStatus::Alive
        } else {
            LivenessStatus::NotAlive
        }
    }

    /// Whether this is the good value.
    pub fn is_passing(&self) -> bool {
        matches!(self, LivenessStatus::Alive)
    }
}

/// Point-in-time general health, with the service version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthSnapshot {
    /// UP or DOWN.
    pub status: HealthStatus,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// When the snapshot was taken (RFC 3339, UTC).
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: OffsetDateTime,
}

/// Point-in-time readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReadinessSnapshot {
    /// READY or NOT_READY.
    pub status: ReadinessStatus,
    /// Service name.
    pub service: String,
    /// When the snapshot was taken (RFC 3339, UTC).
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: OffsetDateTime,
}

/// Point-in-time liveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LivenessSnapshot {
    /// ALIVE or NOT_ALIVE.
    pub status: LivenessStatus,
    /// Service name.
    pub service: String,
    /// When the snapshot was taken (RFC 3339, UTC).
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: OffsetDateTime,
}
