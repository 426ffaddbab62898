//! Command relay for the HotKeyNDQ flight simulator controller.
//!
//! The relay listens on a TCP port for newline-delimited JSON commands sent
//! by the Android client, maps each command identifier to a simulator event
//! and hands it to an event backend. A UDP responder answers LAN discovery
//! probes so the client can find the relay without manual configuration.
//!
//! Every connection is served on its own thread. All blocking loops read
//! with a bounded timeout and re-check a shared [`ShutdownCoordinator`],
//! which is triggered by the `QUIT_SERVER` command or a termination signal.
//!
//! Backend failures never reach clients: a missing backend, an unavailable
//! event registry or an unknown event name is logged and the command is
//! dropped. Only failing to bind either socket at start-up is fatal.

mod bootstrap;
mod discovery;
mod dispatch;
mod health;
mod process;
mod protocol;
mod server;
mod shutdown;
mod sink;
pub mod telemetry;
mod transport;

pub use bootstrap::{ConfigLoader, StaticConfigLoader, SystemConfigLoader};
pub use discovery::{DiscoveryError, FALLBACK_SERVER_NAME};
pub use dispatch::{MappedEvent, resolve_command};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, LaunchPlan, ShutdownError, ShutdownSignal, SignalWatch, SystemShutdownSignal,
    run_server, run_server_with,
};
pub use protocol::{
    COMMAND_TYPE, DISCOVERY_PROBE, DISCOVERY_RESPONSE_TYPE, DiscoveryReply, Message, MessageError,
    QUIT_SENTINEL,
};
pub use server::{RunningServer, start_server};
pub use shutdown::{ShutdownCoordinator, ShutdownReason};
pub use sink::{
    BackendEventSink, ConnectedSink, DryRunBackend, EventBackend, EventHandler, EventRegistry,
    EventSink, EventValue, SinkError,
};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{FrameError, ListenerError};

#[cfg(test)]
mod tests;
