//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::ServiceError;
use crate::health::ServiceIdentity;

/// Log output format. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default)]
#[serde(try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl TryFrom<String> for LogFormat {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    // === Service Identity ===
    /// Service name reported by every probe.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Service version reported by the health probe.
    #[serde(default = "default_service_version")]
    pub service_version: String,

    /// Deployment environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,

    // === Server Configuration ===
    /// HTTP server port for the probe endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds in-flight requests get to finish on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,

    // === CORS ===
    /// Allowed origin patterns. A `*` in the host matches any subdomain.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age_seconds: u64,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_service_name() -> String {
    "transaction-service".to_string()
}

fn default_service_version() -> String {
    "1.0.0-SNAPSHOT".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
        "https://*.vercel.app".to_string(),
        "https://*.netlify.app".to_string(),
    ]
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: default_service_version(),
            environment: default_environment(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            cors_allowed_origins: default_cors_allowed_origins(),
            cors_max_age_seconds: default_cors_max_age(),
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map(Self::normalized)
    }

    /// Trim list entries and drop blanks left by stray commas.
    fn normalized(mut self) -> Self {
        self.cors_allowed_origins = self
            .cors_allowed_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.service_name.trim().is_empty() {
            return Err("SERVICE_NAME must not be empty".to_string());
        }

        if self.service_version.trim().is_empty() {
            return Err("SERVICE_VERSION must not be empty".to_string());
        }

        if self.cors_allowed_origins.iter().all(|o| o.trim().is_empty()) {
            return Err("CORS_ALLOWED_ORIGINS must list at least one origin".to_string());
        }

        if let Some(bad) = self
            .cors_allowed_origins
            .iter()
            .find(|o| o.matches('*').count() > 1)
        {
            return Err(format!(
                "CORS_ALLOWED_ORIGINS entry {bad} has more than one wildcard"
            ));
        }

        Ok(())
    }

    /// Validate, surfacing failures as [`ServiceError::InvalidConfig`].
    pub fn ensure_valid(&self) -> crate::Result<()> {
        self.validate().map_err(ServiceError::InvalidConfig)
    }

    /// Build the process identity reported by the probes.
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(&self.service_name, &self.service_version)
    }

    /// Check if running in production.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Graceful shutdown grace period.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }

    /// Preflight cache lifetime.
    pub fn cors_max_age(&self) -> Duration {
        Duration::from_secs(self.cors_max_age_seconds)
    }
}
