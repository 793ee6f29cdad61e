//! Pluggable checks evaluated behind each probe.

use std::fmt;

use crate::error::HealthError;

/// A single condition a probe depends on.
///
/// Implementations must be cheap and non-blocking; they run inline on
/// every report call.
pub trait HealthCheck: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Evaluate the condition.
    fn check(&self) -> Result<(), HealthError>;
}

/// Check backed by a closure.
pub struct FnCheck<F> {
    name: String,
    f: F,
}

impl<F> FnCheck<F>
where
    F: Fn() -> Result<(), HealthError> + Send + Sync,
{
    /// Wrap a closure as a named check.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> HealthCheck for FnCheck<F>
where
    F: Fn() -> Result<(), HealthError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<(), HealthError> {
        (self.f)()
    }
}

impl<F> fmt::Debug for FnCheck<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCheck").field("name", &self.name).finish()
    }
}

/// Shorthand for [`FnCheck::new`].
pub fn check_fn<F>(name: impl Into<String>, f: F) -> FnCheck<F>
where
    F: Fn() -> Result<(), HealthError> + Send + Sync,
{
    FnCheck::new(name, f)
}
