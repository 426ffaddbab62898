//! Delivery of mapped events to the simulator backend.
//!
//! Connections hand every mapped command to an [`EventSink`]. The production
//! sink, [`BackendEventSink`], opens the backend's event registry lazily and
//! caches resolved handlers by event name. Backend problems are logged and
//! never reach the connection that sent the command.

mod adapter;
mod backend;
mod cache;
mod dry_run;

pub use adapter::{BackendEventSink, ConnectedSink};
pub use backend::{EventBackend, EventHandler, EventRegistry, EventValue, SinkError};
pub use dry_run::DryRunBackend;

const SINK_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::sink");

/// Receives mapped events from every connection.
pub trait EventSink: Send + Sync {
    /// Delivers `event` with an optional payload. Failures are logged.
    fn dispatch(&self, event: &str, value: Option<EventValue>);
}
