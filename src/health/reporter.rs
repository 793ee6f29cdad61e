//! The health reporter: answers the health, readiness and liveness questions.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use super::check::HealthCheck;
use super::clock::{Clock, SystemClock};
use super::types::{
    HealthSnapshot, HealthStatus, LivenessSnapshot, LivenessStatus, Probe, ReadinessSnapshot,
    ReadinessStatus, ServiceIdentity,
};
use crate::error::HealthError;
use crate::metrics;

/// Checks registered per probe.
#[derive(Default)]
struct ProbeChecks {
    health: Vec<Arc<dyn HealthCheck>>,
    readiness: Vec<Arc<dyn HealthCheck>>,
    liveness: Vec<Arc<dyn HealthCheck>>,
}

impl ProbeChecks {
    fn for_probe(&self, probe: Probe) -> &[Arc<dyn HealthCheck>] {
        match probe {
            Probe::Health => &self.health,
            Probe::Readiness => &self.readiness,
            Probe::Liveness => &self.liveness,
        }
    }

    fn for_probe_mut(&mut self, probe: Probe) -> &mut Vec<Arc<dyn HealthCheck>> {
        match probe {
            Probe::Health => &mut self.health,
            Probe::Readiness => &mut self.readiness,
            Probe::Liveness => &mut self.liveness,
        }
    }
}

/// Produces point-in-time health, readiness and liveness snapshots.
///
/// Cloning is cheap; all clones share the same identity, clock and checks.
/// Report calls never fail: a failing check turns into a negative status.
#[derive(Clone)]
pub struct HealthReporter {
    identity: Arc<ServiceIdentity>,
    clock: Arc<dyn Clock>,
    checks: Arc<ProbeChecks>,
}

impl fmt::Debug for HealthReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthReporter")
            .field("identity", &self.identity)
            .field("clock", &self.clock)
            .field("health_checks", &self.checks.health.len())
            .field("readiness_checks", &self.checks.readiness.len())
            .field("liveness_checks", &self.checks.liveness.len())
            .finish()
    }
}

impl HealthReporter {
    /// Create a reporter with the system clock and no checks.
    pub fn new(identity: Arc<ServiceIdentity>) -> Self {
        Self::builder(identity).build()
    }

    /// Start building a reporter.
    pub fn builder(identity: Arc<ServiceIdentity>) -> HealthReporterBuilder {
        HealthReporterBuilder {
            identity,
            clock: None,
            checks: ProbeChecks::default(),
        }
    }

    /// Identity reported by every probe.
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// Is the process up.
    #[instrument(level = "debug", skip(self), fields(service = %self.identity.name()))]
    pub fn report_health(&self) -> HealthSnapshot {
        let start = Instant::now();
        let status = HealthStatus::from_passing(self.evaluate(Probe::Health));

        let snapshot = HealthSnapshot {
            status,
            service: self.identity.name().to_string(),
            version: self.identity.version().to_string(),
            timestamp: self.clock.now(),
        };

        metrics::record_report(Probe::Health, &status.to_string(), start);
        snapshot
    }

    /// Is the process ready to accept work.
    #[instrument(level = "debug", skip(self), fields(service = %self.identity.name()))]
    pub fn report_readiness(&self) -> ReadinessSnapshot {
        let start = Instant::now();
        let status = ReadinessStatus::from_passing(self.evaluate(Probe::Readiness));

        let snapshot = ReadinessSnapshot {
            status,
            service: self.identity.name().to_string(),
            timestamp: self.clock.now(),
        };

        metrics::record_report(Probe::Readiness, &status.to_string(), start);
        snapshot
    }

    /// Is the process alive.
    #[instrument(level = "debug", skip(self), fields(service = %self.identity.name()))]
    pub fn report_liveness(&self) -> LivenessSnapshot {
        let start = Instant::now();
        let status = LivenessStatus::from_passing(self.evaluate(Probe::Liveness));

        let snapshot = LivenessSnapshot {
            status,
            service: self.identity.name().to_string(),
            timestamp: self.clock.now(),
        };

        metrics::record_report(Probe::Liveness, &status.to_string(), start);
        snapshot
    }

    /// Run every check registered for `probe`. Returns true when all pass.
    fn evaluate(&self, probe: Probe) -> bool {
        let checks = self.checks.for_probe(probe);
        if checks.is_empty() {
            return true;
        }

        let mut passing = true;
        for check in checks {
            let outcome = catch_unwind(AssertUnwindSafe(|| check.check()))
                .unwrap_or_else(|payload| Err(panic_to_error(payload)));

            match outcome {
                Ok(()) => debug!(%probe, check = check.name(), "check passed"),
                Err(e) => {
                    warn!(%probe, check = check.name(), error = %e, "check failed");
                    metrics::inc_check_failures(probe, check.name(), e.kind());
                    passing = false;
                }
            }
        }

        passing
    }
}

fn panic_to_error(payload: Box<dyn Any + Send>) -> HealthError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
    };
    HealthError::InternalReportingFailure(message)
}

/// Builder for [`HealthReporter`].
pub struct HealthReporterBuilder {
    identity: Arc<ServiceIdentity>,
    clock: Option<Arc<dyn Clock>>,
    checks: ProbeChecks,
}

impl HealthReporterBuilder {
    /// Use a custom clock instead of the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Register a check behind `probe`.
    pub fn check(mut self, probe: Probe, check: impl HealthCheck + 'static) -> Self {
        self.checks.for_probe_mut(probe).push(Arc::new(check));
        self
    }

    /// Register an already shared check behind `probe`.
    pub fn shared_check(mut self, probe: Probe, check: Arc<dyn HealthCheck>) -> Self {
        self.checks.for_probe_mut(probe).push(check);
        self
    }

    /// Finish building.
    pub fn build(self) -> HealthReporter {
        HealthReporter {
            identity: self.identity,
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(SystemClock::new())),
            checks: Arc::new(self.checks),
        }
    }
}
