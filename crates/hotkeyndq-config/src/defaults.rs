use crate::backend::BackendMode;
use crate::logging::LogFormat;

/// TCP port the Android controller connects to by default.
pub const DEFAULT_COMMAND_PORT: u16 = 5555;

/// UDP port the relay answers discovery probes on by default.
pub const DEFAULT_DISCOVERY_PORT: u16 = 5556;

/// Host both listeners bind to by default.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Poll interval used by every blocking loop, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Lower bound applied to configured poll intervals.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Lower bound applied to the configured line cap. Matches the relay's read
/// chunk so a single command line never needs more than two reads.
pub const MIN_MAX_LINE_BYTES: usize = 1024;

/// Maximum bytes a client may buffer without sending a newline.
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned bind host used where allocation is required (e.g. serde).
pub fn default_bind_host() -> String {
    DEFAULT_BIND_HOST.to_owned()
}

/// Default TCP command port.
pub const fn default_command_port() -> u16 {
    DEFAULT_COMMAND_PORT
}

/// Default UDP discovery port.
pub const fn default_discovery_port() -> u16 {
    DEFAULT_DISCOVERY_PORT
}

/// Default poll interval in milliseconds.
pub const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Default framer cap in bytes.
pub const fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub fn default_log_format() -> LogFormat {
    LogFormat::default()
}

/// Default event backend.
pub fn default_backend() -> BackendMode {
    BackendMode::default()
}
