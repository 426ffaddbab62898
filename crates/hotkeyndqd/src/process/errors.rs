//! Defines the unified error surface for relay launch and supervision.

use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

use crate::discovery::DiscoveryError;
use crate::telemetry::TelemetryError;
use crate::transport::ListenerError;

use super::signals::ShutdownError;

/// Errors surfaced while launching or supervising the relay.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Config {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The command listener could not be bound or joined.
    #[error("command listener failed: {source}")]
    Listener {
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
    /// The discovery responder could not be bound or joined.
    #[error("discovery responder failed: {source}")]
    Discovery {
        /// Underlying discovery error.
        #[source]
        source: DiscoveryError,
    },
    /// Installing the signal watcher failed.
    #[error("failed to watch for shutdown signals: {source}")]
    Shutdown {
        /// Underlying shutdown error.
        #[source]
        source: ShutdownError,
    },
}

impl From<Arc<OrthoError>> for LaunchError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Config { source }
    }
}

impl From<TelemetryError> for LaunchError {
    fn from(source: TelemetryError) -> Self {
        Self::Telemetry { source }
    }
}

impl From<ListenerError> for LaunchError {
    fn from(source: ListenerError) -> Self {
        Self::Listener { source }
    }
}

impl From<DiscoveryError> for LaunchError {
    fn from(source: DiscoveryError) -> Self {
        Self::Discovery { source }
    }
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}
