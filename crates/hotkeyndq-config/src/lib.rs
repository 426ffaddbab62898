//! Layered configuration for the HotKeyNDQ command relay.
//!
//! [`Config`] is assembled by `ortho_config` from built-in defaults, an
//! optional TOML file (`--config-path` or `HOTKEYNDQ_CONFIG_PATH`), `HOTKEYNDQ_*`
//! environment variables, and finally command-line flags. Later sources win.
//!
//! The relay reads everything it needs through the typed accessors on
//! [`Config`]; the raw fields stay public so tests can build values with
//! struct update syntax.

mod backend;
mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use backend::{BackendMode, BackendModeParseError};
pub use defaults::{
    DEFAULT_BIND_HOST, DEFAULT_COMMAND_PORT, DEFAULT_DISCOVERY_PORT, DEFAULT_LOG_FILTER,
    DEFAULT_MAX_LINE_BYTES, DEFAULT_POLL_INTERVAL_MS, MIN_MAX_LINE_BYTES, MIN_POLL_INTERVAL_MS,
    default_backend, default_bind_host, default_command_port, default_discovery_port,
    default_log_filter, default_log_filter_string, default_log_format, default_max_line_bytes,
    default_poll_interval_ms,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HOTKEYNDQ")]
pub struct Config {
    /// Host the command listener and discovery responder bind to.
    #[serde(default = "default_bind_host")]
    #[ortho_config(default = default_bind_host())]
    pub bind_host: String,
    /// TCP port accepting newline-delimited JSON commands.
    #[serde(default = "default_command_port")]
    #[ortho_config(default = default_command_port())]
    pub command_port: u16,
    /// UDP port answering discovery probes.
    #[serde(default = "default_discovery_port")]
    #[ortho_config(default = default_discovery_port())]
    pub discovery_port: u16,
    /// Name advertised in discovery replies. Falls back to the host name.
    #[serde(default)]
    pub server_name: Option<String>,
    /// Address advertised in discovery replies. Detected per probe when unset.
    #[serde(default)]
    pub advertise_address: Option<String>,
    /// Interval after which blocking loops re-check the shutdown flag.
    #[serde(default = "default_poll_interval_ms")]
    #[ortho_config(default = default_poll_interval_ms())]
    pub poll_interval_ms: u64,
    /// Bytes a client may buffer without a newline before it is disconnected.
    #[serde(default = "default_max_line_bytes")]
    #[ortho_config(default = default_max_line_bytes())]
    pub max_line_bytes: usize,
    /// Event backend commands are forwarded to.
    #[serde(default = "default_backend")]
    #[ortho_config(default = default_backend())]
    pub backend: BackendMode,
    /// `tracing_subscriber::EnvFilter` expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            command_port: DEFAULT_COMMAND_PORT,
            discovery_port: DEFAULT_DISCOVERY_PORT,
            server_name: None,
            advertise_address: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            backend: BackendMode::default(),
            log_filter: default_log_filter_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Host both listeners bind to.
    #[must_use]
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_str()
    }

    /// TCP command port.
    #[must_use]
    pub const fn command_port(&self) -> u16 {
        self.command_port
    }

    /// UDP discovery port.
    #[must_use]
    pub const fn discovery_port(&self) -> u16 {
        self.discovery_port
    }

    /// Configured discovery name, if any.
    #[must_use]
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// Configured discovery address, if any.
    #[must_use]
    pub fn advertise_address(&self) -> Option<&str> {
        self.advertise_address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
    }

    /// Poll interval, clamped to [`MIN_POLL_INTERVAL_MS`].
    ///
    /// Socket read timeouts reject a zero duration, so the clamp also keeps
    /// a misconfigured value from turning every read into an error.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Framer cap in bytes, clamped to [`MIN_MAX_LINE_BYTES`].
    #[must_use]
    pub const fn max_line_bytes(&self) -> usize {
        if self.max_line_bytes < MIN_MAX_LINE_BYTES {
            MIN_MAX_LINE_BYTES
        } else {
            self.max_line_bytes
        }
    }

    /// Selected event backend.
    #[must_use]
    pub const fn backend(&self) -> BackendMode {
        self.backend
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
