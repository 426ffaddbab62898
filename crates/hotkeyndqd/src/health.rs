//! Structured health reporting for relay lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use hotkeyndq_config::{BackendMode, Config};

use crate::shutdown::ShutdownReason;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked once the event backend has been chosen.
    fn backend_selected(&self, mode: BackendMode);

    /// Invoked before the listening sockets are bound.
    fn server_starting(&self, config: &Config);

    /// Invoked when the command listener is accepting connections.
    fn command_listener_ready(&self, addr: SocketAddr);

    /// Invoked when the discovery responder is answering probes.
    fn discovery_ready(&self, addr: SocketAddr);

    /// Invoked when the shutdown flag is observed.
    fn shutdown_requested(&self, reason: &ShutdownReason);

    /// Invoked after every server thread has exited.
    fn server_stopped(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn backend_selected(&self, mode: BackendMode) {
        (**self).backend_selected(mode);
    }

    fn server_starting(&self, config: &Config) {
        (**self).server_starting(config);
    }

    fn command_listener_ready(&self, addr: SocketAddr) {
        (**self).command_listener_ready(addr);
    }

    fn discovery_ready(&self, addr: SocketAddr) {
        (**self).discovery_ready(addr);
    }

    fn shutdown_requested(&self, reason: &ShutdownReason) {
        (**self).shutdown_requested(reason);
    }

    fn server_stopped(&self) {
        (**self).server_stopped();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn backend_selected(&self, mode: BackendMode) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "backend_selected",
            backend = %mode,
            "event backend selected"
        );
    }

    fn server_starting(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_starting",
            bind_host = %config.bind_host(),
            command_port = config.command_port(),
            discovery_port = config.discovery_port(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "starting command relay"
        );
    }

    fn command_listener_ready(&self, addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "command_listener_ready",
            %addr,
            "accepting commands"
        );
    }

    fn discovery_ready(&self, addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "discovery_ready",
            %addr,
            "answering discovery probes"
        );
    }

    fn shutdown_requested(&self, reason: &ShutdownReason) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_requested",
            %reason,
            "shutting down"
        );
    }

    fn server_stopped(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_stopped",
            "server stopped"
        );
    }
}
