//! Panics inside checks are logged through tracing, not raw stderr.
//!
//! Kept in its own test binary because the panic hook is process-wide.

use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use service_health::health::{check_fn, HealthReporter, HealthStatus, Probe};
use service_health::utils::install_panic_hook;
use service_health::ServiceIdentity;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn panicking_check_is_logged_as_json() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(captured.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    install_panic_hook();

    let reporter = HealthReporter::builder(Arc::new(ServiceIdentity::new(
        "transaction-service",
        "1.0.0-SNAPSHOT",
    )))
    .check(Probe::Health, check_fn("exploding", || panic!("disk on fire")))
    .build();

    assert_eq!(reporter.report_health().status, HealthStatus::Down);

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("panic captured"), "{output}");
    assert!(output.contains("disk on fire"), "{output}");
    for line in output.lines() {
        assert!(
            serde_json::from_str::<serde_json::Value>(line).is_ok(),
            "not json: {line}"
        );
    }
}
