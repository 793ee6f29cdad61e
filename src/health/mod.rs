//! Health reporting core.
//!
//! This module handles:
//! - Identity and snapshot types
//! - Clock sources for timestamps
//! - Pluggable checks behind each probe
//! - The reporter that ties them together
//!
//! Nothing here knows about HTTP; the [`crate::api`] module is one caller.

pub mod check;
pub mod clock;
pub mod reporter;
pub mod types;

pub use check::{check_fn, FnCheck, HealthCheck};
pub use clock::{Clock, FixedClock, SystemClock};
pub use reporter::{HealthReporter, HealthReporterBuilder};
pub use types::{
    HealthSnapshot, HealthStatus, LivenessSnapshot, LivenessStatus, Probe, ReadinessSnapshot,
    ReadinessStatus, ServiceIdentity,
};
