//! Assembly of the listener, responder and sink into a running relay.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use hotkeyndq_config::Config;

use crate::discovery::{DiscoveryHandle, DiscoveryResponder, ServerIdentity};
use crate::dispatch::{CommandConnectionHandler, CommandRouter};
use crate::health::HealthReporter;
use crate::process::LaunchError;
use crate::shutdown::{ShutdownCoordinator, ShutdownReason};
use crate::sink::EventSink;
use crate::transport::{CommandListener, ListenerHandle};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Binds both sockets and starts the accept and discovery threads.
///
/// Both sockets are bound before either thread starts, so a bind failure
/// leaves nothing running.
///
/// # Errors
///
/// Returns [`LaunchError::Listener`] or [`LaunchError::Discovery`] when a
/// socket cannot be bound or configured, or when the advertise address is
/// not an IP address.
pub fn start_server(
    config: &Config,
    sink: Arc<dyn EventSink>,
    reporter: Arc<dyn HealthReporter>,
) -> Result<RunningServer, LaunchError> {
    reporter.server_starting(config);

    let listener = CommandListener::bind(config.bind_host(), config.command_port())?;
    let responder = DiscoveryResponder::bind(config.bind_host(), config.discovery_port())?;
    let command_addr = listener.local_addr();
    let discovery_addr = responder.local_addr();
    let identity = ServerIdentity::from_config(config, command_addr.port())?;

    let shutdown = ShutdownCoordinator::new();
    let poll_interval = config.poll_interval();
    let router = CommandRouter::new(sink, shutdown.clone());
    let handler = Arc::new(CommandConnectionHandler::new(
        router,
        shutdown.clone(),
        poll_interval,
        config.max_line_bytes(),
    ));

    let listener = listener.start(handler, shutdown.clone())?;
    reporter.command_listener_ready(command_addr);

    let discovery = match responder.start(identity, shutdown.clone(), poll_interval) {
        Ok(handle) => handle,
        Err(error) => {
            shutdown.trigger(ShutdownReason::Requested);
            if let Err(join_error) = listener.join() {
                warn!(target: SERVER_TARGET, error = %join_error, "listener did not stop cleanly");
            }
            return Err(error.into());
        }
    };
    reporter.discovery_ready(discovery_addr);

    Ok(RunningServer {
        command_addr,
        discovery_addr,
        poll_interval,
        shutdown,
        reporter,
        listener: Some(listener),
        discovery: Some(discovery),
    })
}

/// A relay whose background threads are running.
///
/// Dropping the value requests shutdown without waiting for the threads.
pub struct RunningServer {
    command_addr: SocketAddr,
    discovery_addr: SocketAddr,
    poll_interval: Duration,
    shutdown: ShutdownCoordinator,
    reporter: Arc<dyn HealthReporter>,
    listener: Option<ListenerHandle>,
    discovery: Option<DiscoveryHandle>,
}

impl RunningServer {
    /// Bound TCP command address.
    #[must_use]
    pub const fn command_addr(&self) -> SocketAddr {
        self.command_addr
    }

    /// Bound UDP discovery address.
    #[must_use]
    pub const fn discovery_addr(&self) -> SocketAddr {
        self.discovery_addr
    }

    /// Coordinator shared by every server loop.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Requests shutdown. Returns `true` when this call set the flag.
    pub fn stop(&self) -> bool {
        self.shutdown.trigger(ShutdownReason::Requested)
    }

    /// Blocks until shutdown is requested and reports the reason.
    pub fn wait(&self) -> ShutdownReason {
        let reason = self.shutdown.wait(self.poll_interval);
        self.reporter.shutdown_requested(&reason);
        reason
    }

    /// Requests shutdown if nobody has yet, then joins every server thread.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when a server thread panicked.
    pub fn join(mut self) -> Result<(), LaunchError> {
        self.shutdown.trigger(ShutdownReason::Requested);
        let listener = self.listener.take().map_or(Ok(()), ListenerHandle::join);
        let discovery = self.discovery.take().map_or(Ok(()), DiscoveryHandle::join);
        self.reporter.server_stopped();
        listener?;
        discovery?;
        Ok(())
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.trigger(ShutdownReason::Requested);
    }
}

impl fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningServer")
            .field("command_addr", &self.command_addr)
            .field("discovery_addr", &self.discovery_addr)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish_non_exhaustive()
    }
}
