//! Network configuration.
//!
//! Host and port are the only externally supplied settings. The idle timeout
//! can be shortened through the environment, mainly for local testing.

use std::time::Duration;

use crate::config::lobby::{IDLE_CHECK_INTERVAL_SECS, IDLE_TIMEOUT_SECS};

/// Default bind host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind host.
    pub host: String,
    /// Server listen port. `0` asks the OS for an ephemeral port.
    pub port: u16,
    /// Inactivity after which the lobby shuts the listener down.
    pub idle_timeout: Duration,
    /// Period of the inactivity check.
    pub idle_check_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from `TRIQUI_HOST`, `TRIQUI_PORT` and
    /// `TRIQUI_IDLE_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        ServerConfig {
            host: std::env::var("TRIQUI_HOST").unwrap_or(defaults.host),
            port: std::env::var("TRIQUI_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            idle_timeout: std::env::var("TRIQUI_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            idle_check_interval: defaults.idle_check_interval,
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            idle_timeout: Duration::from_secs(IDLE_TIMEOUT_SECS),
            idle_check_interval: Duration::from_secs(IDLE_CHECK_INTERVAL_SECS),
        }
    }
}
