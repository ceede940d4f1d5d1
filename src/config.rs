//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::{Result, ServiceError};

/// Log output format.
pub const LOG_FORMAT_PRETTY: &str = "pretty";
/// JSON log output, one object per line.
pub const LOG_FORMAT_JSON: &str = "json";

/// Application configuration loaded from environment variables.
///
/// Variable names avoid the `<NAME>_PORT` and `<NAME>_SERVICE_*` shapes
/// Kubernetes injects for every Service in the namespace.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port for the greeting and probe endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port for the Prometheus exporter, read from `METRICS_LISTEN`.
    /// Disabled when unset.
    #[serde(default, rename = "metrics_listen")]
    pub metrics_port: Option<u16>,

    // === Logging ===
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log format: pretty or json.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    LOG_FORMAT_PRETTY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_port: None,
            rust_log: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServiceError::InvalidConfig("PORT must not be 0".to_string()));
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(ServiceError::InvalidConfig(format!(
                "HOST must be an IP address, got {:?}",
                self.host
            )));
        }

        match self.metrics_port {
            Some(0) => {
                return Err(ServiceError::InvalidConfig(
                    "METRICS_LISTEN must not be 0".to_string(),
                ));
            }
            Some(p) if p == self.port => {
                return Err(ServiceError::InvalidConfig(
                    "METRICS_LISTEN must differ from PORT".to_string(),
                ));
            }
            _ => {}
        }

        if !matches!(self.log_format_lower().as_str(), LOG_FORMAT_PRETTY | LOG_FORMAT_JSON) {
            return Err(ServiceError::InvalidConfig(format!(
                "LOG_FORMAT must be pretty or json, got {:?}",
                self.log_format
            )));
        }

        Ok(())
    }

    /// Get the effective log format (lowercase).
    pub fn log_format_lower(&self) -> String {
        self.log_format.to_lowercase()
    }

    /// Check if JSON logging is selected.
    pub fn json_logs(&self) -> bool {
        self.log_format_lower() == LOG_FORMAT_JSON
    }

    /// Address the application listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ServiceError::InvalidConfig(format!("HOST must be an IP address, got {:?}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Address the Prometheus exporter binds to, if enabled.
    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>> {
        match self.metrics_port {
            Some(port) => {
                let addr = self.socket_addr()?;
                Ok(Some(SocketAddr::new(addr.ip(), port)))
            }
            None => Ok(None),
        }
    }
}
