//! Health service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use service_health::api::{cors_layer, create_router, AppState};
use service_health::config::{Config, LogFormat};
use service_health::error::ServiceError;
use service_health::health::{HealthReporter, Probe};
use service_health::metrics;
use service_health::utils::{install_panic_hook, shutdown_signal};

/// Health, readiness and liveness endpoints for the transaction service.
#[derive(Parser, Debug)]
#[command(name = "service-health")]
#[command(about = "Serves health, readiness and liveness probes")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the probe endpoints (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print one snapshot as JSON; exits non-zero when the probe fails.
    Report {
        /// Probe to run: health, ready or live.
        #[arg(long, default_value = "health")]
        probe: Probe,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Logging comes up before config errors are reported
    let loaded = Config::load();
    let (log_format, log_level, verbose) = match &loaded {
        Ok(c) => (c.log_format, c.rust_log.clone(), c.verbose),
        Err(_) => (LogFormat::default(), "info".to_string(), false),
    };
    init_tracing(args.verbose || verbose, log_format, &log_level);
    install_panic_hook();

    let config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Report { probe }) => cmd_report(&config, probe),
        Some(Command::Serve { port }) => cmd_serve(config, port.or(args.port)).await,
        None => cmd_serve(config, args.port).await,
    }
}

fn init_tracing(verbose: bool, format: LogFormat, level: &str) {
    let filter = if verbose {
        EnvFilter::new("service_health=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SERVICE HEALTH - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Service: {} {}", config.service_name, config.service_version);
    println!("  Environment: {}", config.environment);
    println!("  Port: {}", config.port);
    println!("  Log Format: {}", config.log_format);
    println!("  CORS Origins: {}", config.cors_allowed_origins.join(", "));
    println!("  CORS Max Age: {}s", config.cors_max_age_seconds);
    println!("  Shutdown Timeout: {}s", config.shutdown_timeout_seconds);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print a single snapshot.
fn cmd_report(config: &Config, probe: Probe) -> anyhow::Result<()> {
    config.ensure_valid()?;

    let reporter = HealthReporter::new(Arc::new(config.identity()));

    let (body, passing) = match probe {
        Probe::Health => {
            let snapshot = reporter.report_health();
            (serde_json::to_string_pretty(&snapshot)?, snapshot.status.is_passing())
        }
        Probe::Readiness => {
            let snapshot = reporter.report_readiness();
            (serde_json::to_string_pretty(&snapshot)?, snapshot.status.is_passing())
        }
        Probe::Liveness => {
            let snapshot = reporter.report_liveness();
            (serde_json::to_string_pretty(&snapshot)?, snapshot.status.is_passing())
        }
    };

    println!("{}", body);

    if passing {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} probe failed", probe))
    }
}

/// Serve the probe endpoints until a shutdown signal arrives.
async fn cmd_serve(config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    config.ensure_valid().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let port = port_override.unwrap_or(config.port);
    let identity = Arc::new(config.identity());

    info!("Configuration loaded successfully");
    info!(
        service = identity.name(),
        version = identity.version(),
        environment = %config.environment,
        "Starting health service"
    );
    if !config.is_production() {
        info!("Non-production environment, CORS origins: {:?}", config.cors_allowed_origins);
    }

    let mut state = AppState::new(HealthReporter::new(identity));
    match metrics::install_prometheus() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics recorder not installed, /metrics disabled: {}", e),
    }

    let router = create_router(state, cors_layer(&config));

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.map_err(ServiceError::Io)?;
    info!("HTTP server listening on {}", addr);

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = stop_rx.changed().await;
    });
    let mut server_handle = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server_handle => {
            result??;
            warn!("HTTP server exited without a shutdown signal");
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    info!("Shutting down server...");
    let _ = stop_tx.send(true);

    match tokio::time::timeout(config.shutdown_timeout(), server_handle).await {
        Ok(result) => result??,
        Err(_) => warn!(
            "Server forced to shut down after {}s",
            config.shutdown_timeout_seconds
        ),
    }

    info!("Server exited");
    Ok(())
}
